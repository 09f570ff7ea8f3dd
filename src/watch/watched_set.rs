// src/watch/watched_set.rs

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

/// Registry of the files the watcher currently knows about.
///
/// Owned by the core runtime and only touched from its event loop, so it
/// needs no lock. `snapshot` preserves insertion order, which keeps the
/// aggregate token order stable between rebuilds.
#[derive(Debug, Clone, Default)]
pub struct WatchedFileSet {
    paths: IndexSet<PathBuf>,
}

impl WatchedFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already known.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        self.paths.insert(path.into())
    }

    /// Forget `path` and, when it names a directory, every known file under
    /// it. Returns `false` if nothing was known. Remaining paths keep their
    /// relative order.
    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.paths.len();
        self.paths.retain(|known| !known.starts_with(path));
        self.paths.len() != before
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.paths.iter().cloned().collect()
    }
}
