// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate what a build needs (`validate.rs`).
//! - Merge config and command-line flags into [`Settings`] (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, GeneratorSection, OutputSection, RawConfigFile, ScanSection};
pub use settings::Settings;
