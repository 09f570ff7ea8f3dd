// src/engine/scheduler.rs

//! Single-flight build scheduler with one coalesced follow-up build.

use tracing::{debug, error};

/// Scheduler state.
///
/// `BuildingWithQueued` records that at least one trigger arrived while a
/// build was running; how many did is irrelevant because the follow-up build
/// always reads the current watched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Idle,
    Building,
    BuildingWithQueued,
    /// A build failed. Terminal: no further builds are started.
    Failed,
}

impl BuildState {
    pub fn is_building(self) -> bool {
        matches!(self, BuildState::Building | BuildState::BuildingWithQueued)
    }

    /// Only ever true while building.
    pub fn is_queued(self) -> bool {
        matches!(self, BuildState::BuildingWithQueued)
    }
}

/// What the caller must do after [`BuildScheduler::trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Was idle: start a build now.
    StartBuild,
    /// A build is running: one follow-up build is now owed.
    Queued,
    /// A follow-up build was already owed; nothing changes.
    Coalesced,
    /// The scheduler has failed; triggers are dropped.
    Ignored,
}

/// What the caller must do after [`BuildScheduler::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionDecision {
    /// Nothing owed; back to idle.
    Idle,
    /// Start the owed follow-up build now.
    StartQueued,
    /// The build failed; the scheduler is now terminal.
    Fatal,
    /// A completion arrived while no build was running. State unchanged.
    Unexpected,
}

#[derive(Debug, Default)]
pub struct BuildScheduler {
    state: BuildState,
    builds_started: u64,
    triggers_coalesced: u64,
}

impl BuildScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == BuildState::Idle
    }

    pub fn has_failed(&self) -> bool {
        self.state == BuildState::Failed
    }

    /// Total number of builds this scheduler has asked to start.
    pub fn builds_started(&self) -> u64 {
        self.builds_started
    }

    /// Triggers absorbed into an already-owed follow-up build.
    pub fn triggers_coalesced(&self) -> u64 {
        self.triggers_coalesced
    }

    pub fn trigger(&mut self) -> TriggerDecision {
        let decision = match self.state {
            BuildState::Idle => {
                self.state = BuildState::Building;
                self.builds_started += 1;
                TriggerDecision::StartBuild
            }
            BuildState::Building => {
                self.state = BuildState::BuildingWithQueued;
                TriggerDecision::Queued
            }
            BuildState::BuildingWithQueued => {
                self.triggers_coalesced += 1;
                TriggerDecision::Coalesced
            }
            BuildState::Failed => TriggerDecision::Ignored,
        };
        debug!(?decision, state = ?self.state, "scheduler: trigger");
        decision
    }

    pub fn complete(&mut self, success: bool) -> CompletionDecision {
        let decision = match (self.state, success) {
            (BuildState::Building, true) => {
                self.state = BuildState::Idle;
                CompletionDecision::Idle
            }
            (BuildState::BuildingWithQueued, true) => {
                // The queued flag is consumed by the build that starts now.
                self.state = BuildState::Building;
                self.builds_started += 1;
                CompletionDecision::StartQueued
            }
            (BuildState::Building | BuildState::BuildingWithQueued, false) => {
                error!(queued = self.state.is_queued(), "scheduler: build failed");
                self.state = BuildState::Failed;
                CompletionDecision::Fatal
            }
            (BuildState::Idle | BuildState::Failed, _) => CompletionDecision::Unexpected,
        };
        debug!(?decision, state = ?self.state, "scheduler: completion");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_trigger_while_idle_starts_one_build() {
        let mut s = BuildScheduler::new();
        assert_eq!(s.trigger(), TriggerDecision::StartBuild);
        assert_eq!(s.state(), BuildState::Building);
        assert_eq!(s.complete(true), CompletionDecision::Idle);
        assert!(s.is_idle());
        assert_eq!(s.builds_started(), 1);
    }

    #[test]
    fn burst_during_build_yields_exactly_one_follow_up() {
        let mut s = BuildScheduler::new();
        s.trigger();

        assert_eq!(s.trigger(), TriggerDecision::Queued);
        for _ in 0..10 {
            assert_eq!(s.trigger(), TriggerDecision::Coalesced);
        }
        assert!(s.state().is_queued());

        assert_eq!(s.complete(true), CompletionDecision::StartQueued);
        assert_eq!(s.state(), BuildState::Building);
        assert!(!s.state().is_queued());

        assert_eq!(s.complete(true), CompletionDecision::Idle);
        assert_eq!(s.builds_started(), 2);
        assert_eq!(s.triggers_coalesced(), 10);
    }

    #[test]
    fn trigger_after_idle_starts_fresh_build() {
        let mut s = BuildScheduler::new();
        s.trigger();
        s.complete(true);

        assert_eq!(s.trigger(), TriggerDecision::StartBuild);
        assert_eq!(s.builds_started(), 2);
    }

    #[test]
    fn failure_is_terminal_even_with_queued_build() {
        let mut s = BuildScheduler::new();
        s.trigger();
        s.trigger();

        assert_eq!(s.complete(false), CompletionDecision::Fatal);
        assert!(s.has_failed());
        assert!(!s.state().is_building());
        assert_eq!(s.trigger(), TriggerDecision::Ignored);
        assert_eq!(s.builds_started(), 1);
    }

    #[test]
    fn completion_without_build_is_reported_and_harmless() {
        let mut s = BuildScheduler::new();
        assert_eq!(s.complete(true), CompletionDecision::Unexpected);
        assert!(s.is_idle());
    }

    #[test]
    fn queued_implies_building_in_every_reachable_state() {
        let mut s = BuildScheduler::new();
        let ops = [true, true, false, true, false, false, true, true, false];
        for (i, is_trigger) in ops.into_iter().enumerate() {
            if is_trigger {
                s.trigger();
            } else {
                s.complete(i != 8);
            }
            let st = s.state();
            assert!(!st.is_queued() || st.is_building(), "violated at step {i}: {st:?}");
        }
    }
}
