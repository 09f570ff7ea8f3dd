// src/build/backend.rs

//! Pluggable build backend abstraction.
//!
//! The runtime talks to a `BuildBackend` instead of running builds itself.
//! This makes it easy to swap in a fake backend in tests while keeping the
//! production pipeline in [`crate::build::pipeline`].
//!
//! - `RealBuildBackend` runs each build on its own Tokio task and reports
//!   back with `RuntimeEvent::BuildCompleted`.
//! - Tests can provide their own `BuildBackend` that, for example, records
//!   the requests and completes them on demand.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::build::{BuildPipeline, BuildRequest};
use crate::engine::RuntimeEvent;
use crate::errors::Result;

/// Trait abstracting how builds are executed.
///
/// `start_build` must not wait for the build: completion is reported
/// asynchronously through the runtime's event channel so the runtime keeps
/// processing watcher events meanwhile.
pub trait BuildBackend: Send {
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: runs the [`BuildPipeline`].
pub struct RealBuildBackend {
    pipeline: Arc<BuildPipeline>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealBuildBackend {
    pub fn new(pipeline: BuildPipeline, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            runtime_tx,
        }
    }
}

impl BuildBackend for RealBuildBackend {
    fn start_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            tokio::spawn(async move {
                let build_id = request.build_id;
                let result = pipeline.run(request).await;
                if let Err(err) = &result {
                    error!(build_id, error = %err, "build failed");
                }
                if tx
                    .send(RuntimeEvent::BuildCompleted { build_id, result })
                    .await
                    .is_err()
                {
                    warn!(build_id, "runtime gone before build completion was delivered");
                }
            });
            Ok(())
        })
    }
}
