// src/fs/path_utils.rs

//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and normalize it lexically: `.`
/// components are dropped and `..` pops the previous component.
///
/// Symlinks are not resolved, so two spellings of the same file through
/// different links stay distinct.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root.
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
