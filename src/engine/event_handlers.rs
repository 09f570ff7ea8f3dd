// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::build::{BuildRequest, BuildSummary};
use crate::engine::scheduler::{BuildScheduler, CompletionDecision, TriggerDecision};
use crate::engine::{BuildId, RuntimeOptions};
use crate::errors::AtomizerError;
use crate::watch::WatchedFileSet;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug)]
pub enum CoreCommand {
    /// Start this build now.
    StartBuild(BuildRequest),
    /// A build failed: stop and surface the error.
    Abort(AtomizerError),
    /// Request that the process exits (single-build mode, once idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Tracks the id of the build in flight and hands out new ids.
#[derive(Debug, Default)]
pub struct BuildTracker {
    in_flight: Option<BuildId>,
    last_id: BuildId,
}

impl BuildTracker {
    pub fn in_flight(&self) -> Option<BuildId> {
        self.in_flight
    }

    /// Snapshot the watched set into a request for a fresh build id.
    fn begin(&mut self, files: &WatchedFileSet) -> BuildRequest {
        self.last_id += 1;
        self.in_flight = Some(self.last_id);
        BuildRequest {
            build_id: self.last_id,
            inputs: files.snapshot(),
        }
    }
}

/// Kind of set mutation carried by a watcher event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Added,
    Removed,
    Changed,
}

/// Apply a watcher file event to the watched set, then trigger a build if
/// the initial snapshot is complete.
///
/// Before `ready`, events only populate the set: N pre-existing files must
/// not cause N builds.
pub fn handle_file_event(
    scheduler: &mut BuildScheduler,
    files: &mut WatchedFileSet,
    tracker: &mut BuildTracker,
    ready: bool,
    kind: FileEventKind,
    path: PathBuf,
) -> CoreStep {
    match kind {
        FileEventKind::Added => {
            files.add(path.clone());
        }
        FileEventKind::Removed => {
            files.remove(&path);
        }
        FileEventKind::Changed => {}
    }

    if !ready {
        return CoreStep::running(Vec::new());
    }

    debug!(path = %path.display(), ?kind, "watch event -> trigger");
    CoreStep::running(request_build(scheduler, files, tracker))
}

/// Handle the watcher's one-time ready signal: the first trigger.
pub fn handle_ready(
    scheduler: &mut BuildScheduler,
    files: &WatchedFileSet,
    tracker: &mut BuildTracker,
) -> CoreStep {
    info!(files = files.len(), "initial file set ready");
    CoreStep::running(request_build(scheduler, files, tracker))
}

/// Handle a build completion event.
pub fn handle_build_completion(
    scheduler: &mut BuildScheduler,
    files: &WatchedFileSet,
    tracker: &mut BuildTracker,
    options: &RuntimeOptions,
    build_id: BuildId,
    result: Result<BuildSummary, AtomizerError>,
) -> CoreStep {
    if tracker.in_flight != Some(build_id) {
        warn!(
            build_id,
            in_flight = ?tracker.in_flight,
            "ignoring completion of a build that is not in flight"
        );
        return CoreStep::running(Vec::new());
    }
    tracker.in_flight = None;

    let decision = scheduler.complete(result.is_ok());
    match (decision, result) {
        (_, Err(err)) => CoreStep {
            commands: vec![CoreCommand::Abort(err)],
            keep_running: false,
        },
        (CompletionDecision::StartQueued, Ok(summary)) => {
            debug!(build_id = summary.build_id, "starting queued rebuild");
            CoreStep::running(vec![CoreCommand::StartBuild(tracker.begin(files))])
        }
        (CompletionDecision::Idle, Ok(_)) if options.exit_when_idle => CoreStep {
            commands: vec![CoreCommand::RequestExit],
            keep_running: false,
        },
        (decision, _) => {
            debug!(?decision, "build completion handled");
            CoreStep::running(Vec::new())
        }
    }
}

/// Trigger the scheduler and, if it says so, start a build from the current
/// watched set.
fn request_build(
    scheduler: &mut BuildScheduler,
    files: &WatchedFileSet,
    tracker: &mut BuildTracker,
) -> Vec<CoreCommand> {
    match scheduler.trigger() {
        TriggerDecision::StartBuild => vec![CoreCommand::StartBuild(tracker.begin(files))],
        TriggerDecision::Queued | TriggerDecision::Coalesced | TriggerDecision::Ignored => {
            Vec::new()
        }
    }
}
