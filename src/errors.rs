// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtomizerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scan error at {path:?}: {message}")]
    ScanError { path: PathBuf, message: String },

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Output error writing {path:?}: {message}")]
    OutputError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AtomizerError {
    /// Build a [`AtomizerError::ScanError`] from any displayable cause,
    /// keeping the full `anyhow` context chain in the message.
    pub fn scan(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        AtomizerError::ScanError {
            path: path.into(),
            message: format!("{cause:#}"),
        }
    }

    pub fn output(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        AtomizerError::OutputError {
            path: path.into(),
            message: format!("{cause:#}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, AtomizerError>;
