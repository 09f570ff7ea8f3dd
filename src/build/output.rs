// src/build/output.rs

//! Where the generated stylesheet goes.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::build::OutputStatus;
use crate::errors::{AtomizerError, Result};
use crate::fs::FileSystem;

pub trait OutputSink: Send + Sync {
    fn emit(&self, artifact: &str) -> Result<OutputStatus>;
}

/// Writes the artifact to a file, skipping the write when the file already
/// holds exactly these bytes. Writes are atomic, so a failure leaves the
/// previous artifact intact.
#[derive(Debug, Clone)]
pub struct FileSink {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileSink {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn emit(&self, artifact: &str) -> Result<OutputStatus> {
        let existing = self
            .fs
            .read_if_exists(&self.path)
            .map_err(|e| AtomizerError::output(&self.path, e))?;

        if existing.as_deref() == Some(artifact.as_bytes()) {
            info!(path = %self.path.display(), "output unchanged");
            return Ok(OutputStatus::Unchanged(self.path.clone()));
        }

        self.fs
            .write(&self.path, artifact.as_bytes())
            .map_err(|e| AtomizerError::output(&self.path, e))?;
        info!(path = %self.path.display(), bytes = artifact.len(), "output written");
        Ok(OutputStatus::Written(self.path.clone()))
    }
}

/// Prints the artifact to stdout.
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&self, artifact: &str) -> Result<OutputStatus> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(artifact.as_bytes())
            .and_then(|_| lock.flush())
            .map_err(|e| AtomizerError::output("<stdout>", e))?;
        Ok(OutputStatus::Emitted)
    }
}

/// File sink when a destination is configured, stdout otherwise.
pub fn sink_for(fs: Arc<dyn FileSystem>, outfile: Option<PathBuf>) -> Arc<dyn OutputSink> {
    match outfile {
        Some(path) => Arc::new(FileSink::new(fs, path)),
        None => Arc::new(StdoutSink),
    }
}
