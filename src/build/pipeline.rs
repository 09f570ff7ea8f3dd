// src/build/pipeline.rs

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::info;

use crate::build::generator::{CommandGenerator, GenerationRequest, Generator};
use crate::build::output::{OutputSink, sink_for};
use crate::build::{BuildRequest, BuildSummary};
use crate::config::Settings;
use crate::errors::{AtomizerError, Result};
use crate::fs::FileSystem;
use crate::scan::{ClassAttributeExtractor, CorpusScanner, ExclusionFilter, TokenExtractor};
use crate::types::{GeneratorOptions, TokenSet};

/// Scan → generate → output, for one [`BuildRequest`] at a time.
///
/// Scanning and output run on the blocking pool; generation awaits the
/// generator. The pipeline holds no per-build state: every build starts from
/// the request's inputs.
#[derive(Clone)]
pub struct BuildPipeline {
    scanner: Arc<CorpusScanner>,
    generator: Arc<dyn Generator>,
    sink: Arc<dyn OutputSink>,
    recursive: bool,
    options: GeneratorOptions,
    rules: Option<PathBuf>,
    static_config: toml::Table,
}

impl std::fmt::Debug for BuildPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildPipeline")
            .field("scanner", &self.scanner)
            .field("recursive", &self.recursive)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BuildPipeline {
    pub fn new(
        scanner: CorpusScanner,
        generator: Arc<dyn Generator>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            scanner: Arc::new(scanner),
            generator,
            sink,
            recursive: false,
            options: GeneratorOptions::default(),
            rules: None,
            static_config: toml::Table::new(),
        }
    }

    /// Production wiring from resolved settings.
    pub fn from_settings(settings: &Settings, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let extractor: Arc<dyn TokenExtractor> = match &settings.token_pattern {
            Some(pattern) => Arc::new(
                ClassAttributeExtractor::with_pattern(pattern)
                    .map_err(|e| AtomizerError::ConfigError(format!("{e:#}")))?,
            ),
            None => Arc::new(ClassAttributeExtractor::new()),
        };

        let scanner = CorpusScanner::new(
            Arc::clone(&fs),
            extractor,
            ExclusionFilter::new(&settings.exclude),
        );
        let generator = Arc::new(CommandGenerator::new(settings.generator_cmd.clone()));
        let sink = sink_for(fs, settings.outfile.clone());

        Ok(Self::new(scanner, generator, sink)
            .recursive(settings.recursive)
            .options(settings.options.clone())
            .rules(settings.rules.clone())
            .static_config(settings.static_config.clone()))
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(mut self, rules: Option<PathBuf>) -> Self {
        self.rules = rules;
        self
    }

    pub fn static_config(mut self, config: toml::Table) -> Self {
        self.static_config = config;
        self
    }

    /// Scan only; used by `--dry-run`.
    pub async fn collect_tokens(&self, inputs: Vec<PathBuf>) -> Result<TokenSet> {
        let scanner = Arc::clone(&self.scanner);
        let recursive = self.recursive;
        tokio::task::spawn_blocking(move || scanner.scan(&inputs, recursive, None))
            .await
            .map_err(|e| AtomizerError::Other(anyhow!("scan task failed: {e}")))?
    }

    pub async fn run(&self, request: BuildRequest) -> Result<BuildSummary> {
        let BuildRequest { build_id, inputs } = request;
        info!(build_id, inputs = inputs.len(), "build started");

        let scanner = Arc::clone(&self.scanner);
        let recursive = self.recursive;
        let report =
            tokio::task::spawn_blocking(move || scanner.scan_report(&inputs, recursive, None))
                .await
                .map_err(|e| AtomizerError::Other(anyhow!("scan task failed: {e}")))??;

        let generation = GenerationRequest {
            tokens: report.tokens.to_vec(),
            rules: self.rules.clone(),
            options: self.options.clone(),
            config: self.static_config.clone(),
        };
        let artifact = self.generator.generate(&generation).await?;
        let digest = blake3::hash(artifact.as_bytes()).to_hex().to_string();

        let sink = Arc::clone(&self.sink);
        let output = tokio::task::spawn_blocking(move || sink.emit(&artifact))
            .await
            .map_err(|e| AtomizerError::Other(anyhow!("output task failed: {e}")))??;

        let summary = BuildSummary {
            build_id,
            scanned: report.scanned.len(),
            excluded: report.excluded.len(),
            tokens: report.tokens.len(),
            output,
            digest,
        };
        info!(
            build_id,
            scanned = summary.scanned,
            excluded = summary.excluded,
            tokens = summary.tokens,
            output = ?summary.output,
            digest = %summary.digest,
            "build finished"
        );
        Ok(summary)
    }
}
