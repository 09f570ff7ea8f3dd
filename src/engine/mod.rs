// src/engine/mod.rs

//! Orchestration engine.
//!
//! This module ties together:
//! - the build scheduler (at most one build in flight, one coalesced
//!   follow-up),
//! - the watched file set,
//! - the main runtime event loop that reacts to:
//!   - watcher events (initial files, ready, add/remove/change)
//!   - build completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;

use crate::build::BuildSummary;
use crate::errors::AtomizerError;

/// Identifier of one build, unique within a process.
pub type BuildId = u64;

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit once the first successful build has completed and
    /// nothing is queued (single-build mode).
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, builds, and signals.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A file became known (initial snapshot or creation).
    FileAdded { path: PathBuf },
    /// A file disappeared.
    FileRemoved { path: PathBuf },
    /// Any other change to a watched path.
    FileChanged { path: PathBuf },
    /// The initial snapshot has been delivered.
    WatcherReady,
    /// A build finished.
    BuildCompleted {
        build_id: BuildId,
        result: Result<BuildSummary, AtomizerError>,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod scheduler;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
pub use scheduler::{BuildScheduler, BuildState, CompletionDecision, TriggerDecision};
