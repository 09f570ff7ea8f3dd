// src/fs/mod.rs

//! Filesystem abstraction used by the scanner, the watcher's initial
//! discovery, and the output sink. [`mock::MockFileSystem`] backs the tests.

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub mod mock;
pub mod path_utils;

/// Prefix of the temporary files `write` creates next to its destination.
pub const TEMP_FILE_PREFIX: &str = ".atomizer-";

/// What a path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Sockets, FIFOs, devices, ...
    Other,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Stat `path`, following symlinks. A missing path is an error.
    fn kind(&self, path: &Path) -> Result<EntryKind>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Raw bytes; `Ok(None)` if the file does not exist.
    fn read_if_exists(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    /// Replace `path` with `contents` all-or-nothing, creating parent
    /// directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Return the entries of a directory as full paths, in no particular
    /// order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn kind(&self, path: &Path) -> Result<EntryKind> {
        let meta = fs::metadata(path).with_context(|| format!("stat {:?}", path))?;
        let kind = if meta.is_file() {
            EntryKind::File
        } else if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::Other
        };
        Ok(kind)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn read_if_exists(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading file {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;

        // Temp file next to the destination, then rename over it.
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(parent)
            .with_context(|| format!("creating temp file in {:?}", parent))?;
        tmp.write_all(contents)
            .with_context(|| format!("writing temp file for {:?}", path))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("syncing temp file for {:?}", path))?;
        if let Err(e) = tmp.persist(path) {
            bail!("renaming temp file onto {:?}: {}", path, e.error);
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry of {:?}", path))?;
            entries.push(entry.path());
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_creates_parents_and_replaces_content() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("dist/css/atomic.css");
        let fs = RealFileSystem;

        fs.write(&target, b".D(b){display:block}").unwrap();
        fs.write(&target, b".D(n){display:none}").unwrap();

        assert_eq!(
            fs.read_if_exists(&target).unwrap().as_deref(),
            Some(&b".D(n){display:none}"[..])
        );
        // Only the destination remains; the temp file was renamed away.
        assert_eq!(fs.read_dir(&dir.path().join("dist/css")).unwrap().len(), 1);
    }

    #[test]
    fn kind_of_missing_path_is_an_error() {
        let dir = tempdir().unwrap();
        let fs = RealFileSystem;

        assert!(fs.kind(&dir.path().join("nope.html")).is_err());
        assert_eq!(fs.kind(dir.path()).unwrap(), EntryKind::Dir);
        assert_eq!(fs.read_if_exists(&dir.path().join("nope.css")).unwrap(), None);
    }
}
