#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use atomizer_watch::build::{
    BuildBackend, BuildRequest, BuildSummary, GenerationRequest, Generator, OutputSink,
    OutputStatus,
};
use atomizer_watch::engine::RuntimeEvent;
use atomizer_watch::errors::{AtomizerError, Result};

/// A fake build backend that records every request and leaves completion to
/// the test, which sends `BuildCompleted` itself (see [`completed`]).
///
/// This is what lets a test inject watcher events *while* a build is in
/// flight.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    requests: Arc<Mutex<Vec<BuildRequest>>>,
    started_tx: Option<tokio::sync::mpsc::UnboundedSender<BuildRequest>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also forward each request to `tx` as it starts.
    pub fn notify_on_start(mut self, tx: tokio::sync::mpsc::UnboundedSender<BuildRequest>) -> Self {
        self.started_tx = Some(tx);
        self
    }

    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl BuildBackend for RecordingBackend {
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(tx) = &self.started_tx {
            let _ = tx.send(request);
        }
        Box::pin(async { Ok(()) })
    }
}

/// A successful completion event for `build_id`.
pub fn completed(build_id: u64) -> RuntimeEvent {
    RuntimeEvent::BuildCompleted {
        build_id,
        result: Ok(BuildSummary {
            build_id,
            ..BuildSummary::default()
        }),
    }
}

/// A failed completion event for `build_id`.
pub fn failed(build_id: u64, message: &str) -> RuntimeEvent {
    RuntimeEvent::BuildCompleted {
        build_id,
        result: Err(AtomizerError::GenerationError(message.to_string())),
    }
}

/// Generator that renders one line per token, prefixed by the namespace,
/// and remembers every request it saw.
#[derive(Clone, Default)]
pub struct FakeGenerator {
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
    fail_with: Option<String>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<GenerationRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn render(request: &GenerationRequest) -> String {
        let ns = request.options.namespace.as_deref().unwrap_or("");
        request
            .tokens
            .iter()
            .map(|t| format!("{ns} .{t}{{}}\n"))
            .collect()
    }
}

impl Generator for FakeGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push(request.clone());
            match &self.fail_with {
                Some(msg) => Err(AtomizerError::GenerationError(msg.clone())),
                None => Ok(Self::render(request)),
            }
        })
    }
}

/// Sink that keeps every artifact in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    artifacts: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<String> {
        self.artifacts.lock().unwrap().clone()
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, artifact: &str) -> Result<OutputStatus> {
        self.artifacts.lock().unwrap().push(artifact.to_string());
        Ok(OutputStatus::Emitted)
    }
}
