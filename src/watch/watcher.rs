// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::fs::path_utils::absolutize;
use crate::fs::{EntryKind, FileSystem, TEMP_FILE_PREFIX};
use crate::scan::discover_files;

/// What to watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Root inputs (files or directories), as given by the user.
    pub inputs: Vec<PathBuf>,
    /// Whether nested directories are part of the corpus.
    pub recursive: bool,
    /// Paths whose events are dropped (the output file, typically).
    pub ignore: Vec<PathBuf>,
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher over the given inputs.
///
/// Event protocol towards the runtime:
/// 1. one `FileAdded` per file present at startup (same traversal rules as
///    the scanner);
/// 2. a single `WatcherReady`;
/// 3. from then on, `FileAdded` / `FileRemoved` / `FileChanged` translated
///    from `notify` events, in arrival order.
///
/// The notify watcher is attached *before* the initial discovery so changes
/// racing with startup are delivered after `WatcherReady` rather than lost.
/// A missing input fails here, before anything is sent.
pub fn spawn_watcher(
    options: WatchOptions,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let inputs: Vec<PathBuf> = options.inputs.iter().map(|p| absolutize(&cwd, p)).collect();
    let ignore: Vec<PathBuf> = options.ignore.iter().map(|p| absolutize(&cwd, p)).collect();
    let recursive = options.recursive;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("atomizer-watch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("atomizer-watch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    for input in &inputs {
        let mode = match fs.kind(input).with_context(|| format!("watching {:?}", input))? {
            EntryKind::Dir if recursive => RecursiveMode::Recursive,
            _ => RecursiveMode::NonRecursive,
        };
        watcher
            .watch(input, mode)
            .with_context(|| format!("watching {:?}", input))?;
        info!(path = %input.display(), ?mode, "watching");
    }

    let initial: Vec<PathBuf> = discover_files(fs.as_ref(), &inputs, recursive, None)?
        .into_iter()
        .filter(|path| !is_ignored(path, &ignore))
        .collect();
    debug!(files = initial.len(), "initial watch set discovered");

    tokio::spawn(async move {
        for path in initial {
            if runtime_tx.send(RuntimeEvent::FileAdded { path }).await.is_err() {
                return;
            }
        }
        if runtime_tx.send(RuntimeEvent::WatcherReady).await.is_err() {
            return;
        }

        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for rt_event in translate_event(&event, fs.as_ref(), recursive, &ignore) {
                if let Err(err) = runtime_tx.send(rt_event).await {
                    warn!("failed to send watch event to runtime: {err}");
                    // Runtime is gone; nothing left to notify.
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Translate one notify event into runtime events.
///
/// - creations add files (and, when recursive, every file under a new
///   directory);
/// - removals remove;
/// - renames add or remove depending on whether the path still exists;
/// - plain access events are dropped (the scanner's own reads would
///   otherwise trigger rebuilds);
/// - everything else is a change.
pub fn translate_event(
    event: &Event,
    fs: &dyn FileSystem,
    recursive: bool,
    ignore: &[PathBuf],
) -> Vec<RuntimeEvent> {
    let mut out = Vec::new();

    for path in &event.paths {
        if is_ignored(path, ignore) {
            continue;
        }

        match event.kind {
            EventKind::Access(_) => {}
            EventKind::Create(_) => created(path, fs, recursive, &mut out),
            EventKind::Remove(_) => out.push(RuntimeEvent::FileRemoved { path: path.clone() }),
            EventKind::Modify(ModifyKind::Name(_)) => {
                if fs.kind(path).is_ok() {
                    created(path, fs, recursive, &mut out);
                } else {
                    out.push(RuntimeEvent::FileRemoved { path: path.clone() });
                }
            }
            _ => out.push(RuntimeEvent::FileChanged { path: path.clone() }),
        }
    }

    out
}

/// An ignored path itself, or one of the temporary files written next to it
/// while it is replaced.
fn is_ignored(path: &Path, ignore: &[PathBuf]) -> bool {
    ignore.iter().any(|ignored| {
        path == ignored
            || (path.parent() == ignored.parent()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(TEMP_FILE_PREFIX)))
    })
}

fn created(path: &Path, fs: &dyn FileSystem, recursive: bool, out: &mut Vec<RuntimeEvent>) {
    match fs.kind(path) {
        Ok(EntryKind::File) => out.push(RuntimeEvent::FileAdded {
            path: path.to_path_buf(),
        }),
        Ok(EntryKind::Dir) if recursive => {
            match discover_files(fs, &[path.to_path_buf()], true, None) {
                Ok(files) => out.extend(
                    files
                        .into_iter()
                        .map(|path| RuntimeEvent::FileAdded { path }),
                ),
                Err(err) => warn!(path = %path.display(), error = %err, "cannot list new directory"),
            }
        }
        Ok(_) => {}
        // Gone again before we looked: nothing to add.
        Err(_) => {}
    }
}
