// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::GeneratorOptions;

/// Configuration exactly as read from `Atomizer.toml`, before validation.
///
/// ```toml
/// [scan]
/// inputs = ["src"]
/// recursive = true
/// exclude = ["*.min.js"]
///
/// [generator]
/// cmd = "atomizer-rules"
/// namespace = "#app"
///
/// [generator.config]
/// breakPoints = { sm = "@media(min-width:750px)" }
///
/// [output]
/// path = "dist/atomic.css"
/// ```
///
/// All sections are optional at the serde level; [`ConfigFile::try_from`]
/// enforces what a build actually needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scan: ScanSection,

    #[serde(default)]
    pub generator: GeneratorSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[scan]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanSection {
    /// Inputs used when none are passed on the command line.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Descend into nested directories.
    #[serde(default)]
    pub recursive: bool,

    /// Glob patterns of files that never contribute tokens.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Optional regex replacing the built-in class attribute matcher.
    ///
    /// The first capture group (or the whole match) is split on whitespace.
    #[serde(default)]
    pub token_pattern: Option<String>,
}

/// `[generator]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorSection {
    /// Shell command that turns a generation request (TOML on stdin) into a
    /// stylesheet (stdout).
    #[serde(default)]
    pub cmd: Option<String>,

    /// Optional rules file handed to the generator. Must exist.
    #[serde(default)]
    pub rules: Option<PathBuf>,

    #[serde(default)]
    pub rtl: bool,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub helpers_namespace: Option<String>,

    #[serde(default)]
    pub ie: bool,

    /// Static configuration passed verbatim to the generator.
    #[serde(default)]
    pub config: toml::Table,
}

impl GeneratorSection {
    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            rtl: self.rtl,
            namespace: self.namespace.clone(),
            helpers_namespace: self.helpers_namespace.clone(),
            ie: self.ie,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    /// Destination file. When absent the stylesheet goes to stdout.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl RawConfigFile {
    /// Resolve every relative path in the config against `dir` (the
    /// directory holding the config file).
    pub fn resolve_relative_to(mut self, dir: &Path) -> Self {
        let join = |p: PathBuf| if p.is_absolute() { p } else { dir.join(p) };

        self.scan.inputs = self.scan.inputs.into_iter().map(join).collect();
        self.generator.rules = self.generator.rules.map(join);
        self.output.path = self.output.path.map(join);
        self
    }
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (see
/// `validate.rs`) or [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scan: ScanSection,
    pub generator: GeneratorSection,
    pub output: OutputSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        scan: ScanSection,
        generator: GeneratorSection,
        output: OutputSection,
    ) -> Self {
        Self {
            scan,
            generator,
            output,
        }
    }

    /// The generator command; validation guarantees it is present.
    pub fn generator_cmd(&self) -> &str {
        self.generator.cmd.as_deref().unwrap_or_default()
    }
}
