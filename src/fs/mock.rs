// src/fs/mock.rs

use super::{EntryKind, FileSystem};
use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Paths that exist but fail to read or list ("permission denied").
    denied: HashSet<PathBuf>,
    writes: usize,
}

/// In-memory filesystem for tests. Paths are expected to be absolute.
///
/// Directory children are listed in insertion order, which deliberately
/// differs from name order so tests catch any reliance on listing order.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state
            .lock()
            .unwrap()
            .entries
            .insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock().unwrap();
        state.entries.insert(path.clone(), MockEntry::File(content.into()));
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut state.entries, parent);
            Self::link_child(&mut state.entries, parent, &path);
        }
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        Self::ensure_dir_entry(&mut state.entries, path.as_ref());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c.as_str() != name);
            }
        }
    }

    /// Make reads/listings of `path` fail while it still exists.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.state
            .lock()
            .unwrap()
            .denied
            .insert(path.as_ref().to_path_buf());
    }

    /// Number of successful `write` calls so far.
    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    fn ensure_dir_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if entries.contains_key(path) {
            return;
        }
        entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(entries, parent);
            Self::link_child(entries, parent, path);
        }
    }

    fn link_child(entries: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (entries.get_mut(parent), child.file_name().and_then(|n| n.to_str()))
        {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }

    fn check_access(state: &MockState, path: &Path) -> Result<()> {
        if state.denied.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn kind(&self, path: &Path) -> Result<EntryKind> {
        let state = self.state.lock().unwrap();
        match state.entries.get(path) {
            Some(MockEntry::File(_)) => Ok(EntryKind::File),
            Some(MockEntry::Dir(_)) => Ok(EntryKind::Dir),
            None => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state.lock().unwrap();
        Self::check_access(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_if_exists(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let state = self.state.lock().unwrap();
        Self::check_access(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => Ok(Some(content.clone())),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Ok(None),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        {
            let state = self.state.lock().unwrap();
            Self::check_access(&state, path)?;
        }
        self.add_file(path, contents);
        self.state.lock().unwrap().writes += 1;
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        Self::check_access(&state, path)?;
        match state.entries.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
