// src/build/mod.rs

//! Build execution layer.
//!
//! One build = scan the requested inputs, hand the tokens to the generator,
//! pass the artifact to the output sink.
//!
//! - [`pipeline`] runs those three steps for a [`BuildRequest`].
//! - [`generator`] defines the generator contract and the external-command
//!   implementation.
//! - [`output`] defines the output contract (file or stdout).
//! - [`backend`] provides the `BuildBackend` trait the runtime talks to and
//!   the production `RealBuildBackend`; tests swap in fakes.

use std::path::PathBuf;

use crate::engine::BuildId;

pub mod backend;
pub mod generator;
pub mod output;
pub mod pipeline;

pub use backend::{BuildBackend, RealBuildBackend};
pub use generator::{CommandGenerator, GenerationRequest, Generator};
pub use output::{FileSink, OutputSink, StdoutSink, sink_for};
pub use pipeline::BuildPipeline;

/// A build to run: the watched set as it was when the build started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_id: BuildId,
    pub inputs: Vec<PathBuf>,
}

/// What happened to the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputStatus {
    /// Destination rewritten.
    Written(PathBuf),
    /// Destination already held identical bytes; nothing written.
    Unchanged(PathBuf),
    /// Written to stdout.
    #[default]
    Emitted,
}

/// Result of a successful build.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub build_id: BuildId,
    pub scanned: usize,
    pub excluded: usize,
    pub tokens: usize,
    pub output: OutputStatus,
    /// blake3 hex digest of the artifact.
    pub digest: String,
}
