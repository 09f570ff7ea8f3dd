// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::build::BuildBackend;
use crate::errors::Result;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the build scheduler in response to `RuntimeEvent`s, and delegates
/// actual builds to a `BuildBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. This struct handles async IO: reading events from the
/// channel and dispatching builds to the backend.
pub struct Runtime<B: BuildBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
}

impl<B: BuildBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: BuildBackend> Runtime<B> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, backend: B) -> Self {
        Self {
            core,
            event_rx,
            backend,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (start build, abort, exit).
    ///
    /// Returns the build error if a build fails.
    pub async fn run(mut self) -> Result<()> {
        info!("runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!(builds = self.core.builds_started(), "runtime exiting");
        Ok(())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartBuild(request) => {
                debug!(
                    build_id = request.build_id,
                    inputs = request.inputs.len(),
                    "dispatching build"
                );
                self.backend.start_build(request).await
            }
            CoreCommand::Abort(err) => Err(err),
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
                Ok(())
            }
        }
    }
}
