// src/config/settings.rs

//! Effective run settings: the validated config file with command-line flags
//! layered on top.

use std::path::PathBuf;

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::errors::{AtomizerError, Result};
use crate::types::GeneratorOptions;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Root inputs, fixed for the process lifetime.
    pub inputs: Vec<PathBuf>,
    pub recursive: bool,
    /// Exclusion globs: config first, then `--exclude` flags.
    pub exclude: Vec<String>,
    pub token_pattern: Option<String>,
    pub generator_cmd: String,
    pub rules: Option<PathBuf>,
    pub static_config: toml::Table,
    pub options: GeneratorOptions,
    /// `None` means "write to stdout".
    pub outfile: Option<PathBuf>,
    pub watch: bool,
}

impl Settings {
    /// Merge `cfg` and `args`. Flags win over config values; boolean flags
    /// can only switch a behaviour on.
    pub fn resolve(cfg: &ConfigFile, args: &CliArgs) -> Result<Self> {
        let inputs = if args.inputs.is_empty() {
            cfg.scan.inputs.clone()
        } else {
            args.inputs.clone()
        };

        if inputs.is_empty() {
            return Err(AtomizerError::ConfigError(
                "no inputs: pass files or directories, or set [scan].inputs".to_string(),
            ));
        }

        if args.watch && args.dry_run {
            return Err(AtomizerError::ConfigError(
                "--dry-run cannot be combined with --watch".to_string(),
            ));
        }

        let mut exclude = cfg.scan.exclude.clone();
        exclude.extend(args.exclude.iter().cloned());

        let mut options = cfg.generator.options();
        options.rtl |= args.rtl;
        options.ie |= args.ie;
        if args.namespace.is_some() {
            options.namespace = args.namespace.clone();
        }
        if args.helpers_namespace.is_some() {
            options.helpers_namespace = args.helpers_namespace.clone();
        }

        Ok(Self {
            inputs,
            recursive: args.recursive || cfg.scan.recursive,
            exclude,
            token_pattern: cfg.scan.token_pattern.clone(),
            generator_cmd: cfg.generator_cmd().to_string(),
            rules: cfg.generator.rules.clone(),
            static_config: cfg.generator.config.clone(),
            options,
            outfile: args.outfile.clone().or_else(|| cfg.output.path.clone()),
            watch: args.watch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{GeneratorSection, OutputSection, RawConfigFile, ScanSection};

    fn config() -> ConfigFile {
        ConfigFile::try_from(RawConfigFile {
            scan: ScanSection {
                inputs: vec![PathBuf::from("/site/src")],
                exclude: vec!["*.min.js".to_string()],
                ..ScanSection::default()
            },
            generator: GeneratorSection {
                cmd: Some("atomizer-rules".to_string()),
                namespace: Some("#app".to_string()),
                ..GeneratorSection::default()
            },
            output: OutputSection {
                path: Some(PathBuf::from("/site/dist/atomic.css")),
            },
        })
        .unwrap()
    }

    #[test]
    fn config_values_apply_without_flags() {
        let settings = Settings::resolve(&config(), &CliArgs::default()).unwrap();

        assert_eq!(settings.inputs, vec![PathBuf::from("/site/src")]);
        assert_eq!(settings.exclude, vec!["*.min.js"]);
        assert_eq!(settings.options.namespace.as_deref(), Some("#app"));
        assert_eq!(settings.outfile, Some(PathBuf::from("/site/dist/atomic.css")));
        assert!(!settings.recursive);
    }

    #[test]
    fn flags_override_and_extend_config() {
        let args = CliArgs {
            inputs: vec![PathBuf::from("index.html")],
            recursive: true,
            exclude: vec!["vendor/*".to_string()],
            namespace: Some("#root".to_string()),
            rtl: true,
            outfile: Some(PathBuf::from("out.css")),
            ..CliArgs::default()
        };

        let settings = Settings::resolve(&config(), &args).unwrap();

        assert_eq!(settings.inputs, vec![PathBuf::from("index.html")]);
        assert!(settings.recursive);
        assert_eq!(settings.exclude, vec!["*.min.js", "vendor/*"]);
        assert_eq!(settings.options.namespace.as_deref(), Some("#root"));
        assert!(settings.options.rtl);
        assert_eq!(settings.outfile, Some(PathBuf::from("out.css")));
    }

    #[test]
    fn no_inputs_anywhere_is_a_config_error() {
        let mut cfg = config();
        cfg.scan.inputs.clear();

        let err = Settings::resolve(&cfg, &CliArgs::default()).unwrap_err();
        assert!(matches!(err, AtomizerError::ConfigError(msg) if msg.contains("no inputs")));
    }
}
