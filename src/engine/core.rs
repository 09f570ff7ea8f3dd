// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing `BuildRequest`s to the build backend
//! - handling Ctrl+C / shutdown
//!
//! Every event is handled to completion before the next one is looked at,
//! which is what makes watched-set mutation and snapshotting race-free.

use crate::engine::event_handlers::{
    BuildTracker, CoreStep, FileEventKind, handle_build_completion, handle_file_event,
    handle_ready,
};
use crate::engine::scheduler::{BuildScheduler, BuildState};
use crate::engine::{BuildId, RuntimeEvent, RuntimeOptions};
use crate::watch::WatchedFileSet;

/// Pure core runtime state.
///
/// This owns:
/// - the build scheduler (the process's only one)
/// - the watched file set
/// - whether the watcher has signalled ready
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: BuildScheduler,
    files: WatchedFileSet,
    tracker: BuildTracker,
    ready: bool,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            scheduler: BuildScheduler::new(),
            files: WatchedFileSet::new(),
            tracker: BuildTracker::default(),
            ready: false,
            options,
        }
    }

    pub fn build_state(&self) -> BuildState {
        self.scheduler.state()
    }

    pub fn builds_started(&self) -> u64 {
        self.scheduler.builds_started()
    }

    pub fn in_flight(&self) -> Option<BuildId> {
        self.tracker.in_flight()
    }

    pub fn files(&self) -> &WatchedFileSet {
        &self.files
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::FileAdded { path } => self.file_event(FileEventKind::Added, path),
            RuntimeEvent::FileRemoved { path } => self.file_event(FileEventKind::Removed, path),
            RuntimeEvent::FileChanged { path } => self.file_event(FileEventKind::Changed, path),
            RuntimeEvent::WatcherReady => {
                if self.ready {
                    tracing::warn!("duplicate ready signal ignored");
                    return CoreStep {
                        commands: Vec::new(),
                        keep_running: true,
                    };
                }
                self.ready = true;
                handle_ready(&mut self.scheduler, &self.files, &mut self.tracker)
            }
            RuntimeEvent::BuildCompleted { build_id, result } => handle_build_completion(
                &mut self.scheduler,
                &self.files,
                &mut self.tracker,
                &self.options,
                build_id,
                result,
            ),
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    fn file_event(&mut self, kind: FileEventKind, path: std::path::PathBuf) -> CoreStep {
        handle_file_event(
            &mut self.scheduler,
            &mut self.files,
            &mut self.tracker,
            self.ready,
            kind,
            path,
        )
    }
}
