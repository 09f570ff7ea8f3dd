// src/build/generator.rs

//! Stylesheet generator contract and the external-command implementation.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{AtomizerError, Result};
use crate::types::GeneratorOptions;

/// Everything the generator gets for one build.
///
/// Field order matters for the TOML encoding: plain values first, tables
/// last.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationRequest {
    /// Tokens in first-occurrence order.
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
    pub options: GeneratorOptions,
    /// Static configuration from `[generator.config]`.
    pub config: toml::Table,
}

impl GenerationRequest {
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            AtomizerError::GenerationError(format!("encoding generation request: {e}"))
        })
    }
}

/// Turns a token set into a stylesheet.
///
/// Treated as a pure function by the scheduler: same request, same artifact.
pub trait Generator: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Runs a shell command, feeds it the request as TOML on stdin, and takes
/// its stdout as the stylesheet.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    cmd: String,
}

impl CommandGenerator {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<String> {
        let input = request.to_toml()?;

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(cmd = %self.cmd, tokens = request.tokens.len(), "running generator");

        let mut child = cmd.spawn().map_err(|e| {
            AtomizerError::GenerationError(format!("spawning generator `{}`: {e}", self.cmd))
        })?;

        // Feed stdin concurrently so a generator that streams output before
        // draining its input cannot deadlock on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    // A generator that ignores stdin closes the pipe early.
                    debug!(error = %e, "generator stdin closed early");
                }
            })
        });

        let output = child.wait_with_output().await.map_err(|e| {
            AtomizerError::GenerationError(format!("waiting for generator `{}`: {e}", self.cmd))
        })?;
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                debug!(error = %e, "generator stdin writer task failed");
            }
        }

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AtomizerError::GenerationError(format!(
                "generator `{}` exited with {code}: {}",
                self.cmd,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            AtomizerError::GenerationError(format!(
                "generator `{}` produced non UTF-8 output: {e}",
                self.cmd
            ))
        })
    }
}

impl Generator for CommandGenerator {
    fn generate<'a>(
        &'a self,
        request: &'a GenerationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.run(request))
    }
}
