// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AtomizerError, Result};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`, with relative paths resolved against the config's
/// directory.
///
/// A missing or unreadable file is a [`AtomizerError::ConfigError`]: no build
/// can start without it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        AtomizerError::ConfigError(format!("cannot read config file {:?}: {e}", path))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config.resolve_relative_to(&config_dir(path)))
}

/// Load a configuration file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that a generator command is configured, that the rules file
///   exists and that a custom token pattern compiles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Directory against which relative config paths are resolved.
///
/// A bare file name like `Atomizer.toml` has an empty parent, in which case
/// the current working directory is used.
fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
