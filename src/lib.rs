// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod scan;
pub mod types;
pub mod watch;

use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::build::{BuildPipeline, RealBuildBackend};
use crate::cli::CliArgs;
use crate::config::{Settings, load_and_validate};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{WatchOptions, spawn_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the build pipeline (scanner, generator, output sink)
/// - core runtime + async runtime shell
/// - the file watcher (watch mode) or a one-shot seed (single build)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    let settings = Settings::resolve(&cfg, &args)?;
    debug!(?settings, "resolved settings");

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let pipeline = BuildPipeline::from_settings(&settings, Arc::clone(&fs))?;

    if args.dry_run {
        let tokens = pipeline.collect_tokens(settings.inputs.clone()).await?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for token in tokens.iter() {
            writeln!(out, "{token}")?;
        }
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let backend = RealBuildBackend::new(pipeline, rt_tx.clone());

    // Watch mode: the watcher delivers the initial files, then `ready`.
    // Single build: the root inputs themselves are the whole set.
    let _watcher_handle = if settings.watch {
        let options = WatchOptions {
            inputs: settings.inputs.clone(),
            recursive: settings.recursive,
            ignore: settings.outfile.iter().cloned().collect(),
        };
        Some(spawn_watcher(options, Arc::clone(&fs), rt_tx.clone())?)
    } else {
        let tx = rt_tx.clone();
        let inputs = settings.inputs.clone();
        tokio::spawn(async move {
            for path in inputs {
                if tx.send(RuntimeEvent::FileAdded { path }).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(RuntimeEvent::WatcherReady).await;
        });
        None
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    info!(
        inputs = settings.inputs.len(),
        watch = settings.watch,
        recursive = settings.recursive,
        "starting"
    );

    let options = RuntimeOptions {
        exit_when_idle: !settings.watch,
    };
    let core = CoreRuntime::new(options);
    let runtime = Runtime::new(core, rt_rx, backend);
    runtime.run().await
}
