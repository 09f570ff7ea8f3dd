// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `atomizer-watch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "atomizer-watch",
    version,
    about = "Scan source files for atomic class names and regenerate the stylesheet on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Files or directories to scan.
    ///
    /// Falls back to `[scan].inputs` from the config file when omitted.
    #[arg(value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Atomizer.toml")]
    pub config: PathBuf,

    /// Descend into nested directories.
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Glob pattern of files to skip (repeatable). Appended to `[scan].exclude`.
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Write the stylesheet to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub outfile: Option<PathBuf>,

    /// Keep running and rebuild whenever a watched file changes.
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Generate right-to-left styles.
    #[arg(long)]
    pub rtl: bool,

    /// Namespace prefix for generated selectors.
    #[arg(short = 'n', long, value_name = "NS")]
    pub namespace: Option<String>,

    /// Namespace for helper selectors.
    #[arg(short = 'H', long, value_name = "NS")]
    pub helpers_namespace: Option<String>,

    /// Add legacy Internet Explorer hacks.
    #[arg(long)]
    pub ie: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ATOMIZER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Scan and print the collected tokens, without running the generator.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
