#![allow(dead_code)]

use std::path::PathBuf;

use atomizer_watch::config::{ConfigFile, GeneratorSection, OutputSection, RawConfigFile, ScanSection};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from a config whose generator is `cat`, which echoes the
/// generation request back as the "stylesheet".
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                scan: ScanSection::default(),
                generator: GeneratorSection {
                    cmd: Some("cat".to_string()),
                    ..GeneratorSection::default()
                },
                output: OutputSection::default(),
            },
        }
    }

    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.scan.inputs.push(path.into());
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.scan.recursive = val;
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.scan.exclude.push(pattern.to_string());
        self
    }

    pub fn with_token_pattern(mut self, pattern: &str) -> Self {
        self.config.scan.token_pattern = Some(pattern.to_string());
        self
    }

    pub fn with_generator_cmd(mut self, cmd: &str) -> Self {
        self.config.generator.cmd = Some(cmd.to_string());
        self
    }

    pub fn with_namespace(mut self, ns: &str) -> Self {
        self.config.generator.namespace = Some(ns.to_string());
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.path = Some(path.into());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
