// src/scan/scanner.rs

//! Corpus traversal and token aggregation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{AtomizerError, Result};
use crate::fs::path_utils::absolutize;
use crate::fs::{EntryKind, FileSystem};
use crate::scan::exclude::ExclusionFilter;
use crate::scan::extract::TokenExtractor;
use crate::types::TokenSet;

/// Outcome of one scan: the aggregated tokens plus what was looked at.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub tokens: TokenSet,
    /// Files whose content was read, in scan order.
    pub scanned: Vec<PathBuf>,
    /// Files skipped by the exclusion filter, in scan order.
    pub excluded: Vec<PathBuf>,
}

/// Depth-first scanner over files and directories.
///
/// Traversal rules:
/// - every input is made absolute against `base_dir` (or the working
///   directory for top-level inputs) and must exist;
/// - a directory is listed one level at a time, sorted by name; it is
///   entered when it was named explicitly (`base_dir` is `None`) or when
///   `recursive` is set, otherwise it is skipped;
/// - every file reached is checked against the exclusion filter before it is
///   read.
///
/// The first error aborts the scan.
#[derive(Clone)]
pub struct CorpusScanner {
    fs: Arc<dyn FileSystem>,
    extractor: Arc<dyn TokenExtractor>,
    exclusion: ExclusionFilter,
}

impl std::fmt::Debug for CorpusScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusScanner")
            .field("fs", &self.fs)
            .field("exclusion", &self.exclusion)
            .finish_non_exhaustive()
    }
}

impl CorpusScanner {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        extractor: Arc<dyn TokenExtractor>,
        exclusion: ExclusionFilter,
    ) -> Self {
        Self {
            fs,
            extractor,
            exclusion,
        }
    }

    /// Scan `inputs` and return the order-stable union of their tokens.
    pub fn scan(
        &self,
        inputs: &[PathBuf],
        recursive: bool,
        base_dir: Option<&Path>,
    ) -> Result<TokenSet> {
        Ok(self.scan_report(inputs, recursive, base_dir)?.tokens)
    }

    /// Like [`CorpusScanner::scan`], additionally reporting which files were
    /// read and which were excluded.
    pub fn scan_report(
        &self,
        inputs: &[PathBuf],
        recursive: bool,
        base_dir: Option<&Path>,
    ) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        walk_files(self.fs.as_ref(), inputs, recursive, base_dir, &mut |path: &Path| {
            self.scan_file(path, &mut report)
        })?;

        debug!(
            files = report.scanned.len(),
            excluded = report.excluded.len(),
            tokens = report.tokens.len(),
            "scan finished"
        );
        Ok(report)
    }

    fn scan_file(&self, path: &Path, report: &mut ScanReport) -> Result<()> {
        if self.exclusion.is_excluded(path) {
            info!(path = %path.display(), "excluded from scan");
            report.excluded.push(path.to_path_buf());
            return Ok(());
        }

        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| AtomizerError::scan(path, e))?;
        let tokens = self
            .extractor
            .extract(&content)
            .map_err(|e| AtomizerError::scan(path, e.context("extracting tokens")))?;

        debug!(path = %path.display(), tokens = tokens.len(), "scanned file");
        report.tokens.union_with(&tokens);
        report.scanned.push(path.to_path_buf());
        Ok(())
    }
}

/// Every file reachable from `inputs` under the scanner's traversal rules,
/// without exclusion filtering. Used to seed the watched set.
pub fn discover_files(
    fs: &dyn FileSystem,
    inputs: &[PathBuf],
    recursive: bool,
    base_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_files(fs, inputs, recursive, base_dir, &mut |path: &Path| {
        files.push(path.to_path_buf());
        Ok(())
    })?;
    Ok(files)
}

fn walk_files(
    fs: &dyn FileSystem,
    inputs: &[PathBuf],
    recursive: bool,
    base_dir: Option<&Path>,
    visit: &mut dyn FnMut(&Path) -> Result<()>,
) -> Result<()> {
    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let inputs: Vec<PathBuf> = inputs.iter().map(|i| absolutize(&base, i)).collect();
    walk(fs, &inputs, recursive, true, visit)
}

/// Top-level directories are always listed; nested ones only when recursive.
fn walk(
    fs: &dyn FileSystem,
    paths: &[PathBuf],
    recursive: bool,
    top_level: bool,
    visit: &mut dyn FnMut(&Path) -> Result<()>,
) -> Result<()> {
    for path in paths {
        let kind = fs.kind(path).map_err(|e| AtomizerError::scan(path, e))?;

        match kind {
            EntryKind::File => visit(path)?,
            EntryKind::Dir if top_level || recursive => {
                let mut entries = fs
                    .read_dir(path)
                    .map_err(|e| AtomizerError::scan(path, e))?;
                entries.sort();
                walk(fs, &entries, recursive, false, visit)?;
            }
            EntryKind::Dir => {
                debug!(path = %path.display(), "skipping nested directory (not recursive)");
            }
            EntryKind::Other => {
                debug!(path = %path.display(), "skipping special file");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::scan::extract::ClassAttributeExtractor;

    fn scanner(fs: &MockFileSystem, exclude: &[&str]) -> CorpusScanner {
        CorpusScanner::new(
            Arc::new(fs.clone()),
            Arc::new(ClassAttributeExtractor::new()),
            ExclusionFilter::new(exclude),
        )
    }

    fn tree() -> MockFileSystem {
        let fs = MockFileSystem::new();
        // Inserted out of name order on purpose.
        fs.add_file("/site/b.html", r#"<p class="C(red) D(b)">"#);
        fs.add_file("/site/a.html", r#"<p class="D(b) M(0)">"#);
        fs.add_file("/site/nested/deep.html", r#"<p class="P(10px)">"#);
        fs.add_file("/site/app.min.js", r#"el.className="Op(0)""#);
        fs
    }

    #[test]
    fn directory_children_are_scanned_in_name_order() {
        let fs = tree();
        let tokens = scanner(&fs, &[])
            .scan(&[PathBuf::from("/site")], false, None)
            .unwrap();

        assert_eq!(tokens.to_vec(), vec!["D(b)", "M(0)", "Op(0)", "C(red)"]);
    }

    #[test]
    fn nested_directories_need_recursive() {
        let fs = tree();
        let s = scanner(&fs, &[]);

        let flat = s.scan(&[PathBuf::from("/site")], false, None).unwrap();
        assert!(!flat.contains("P(10px)"));

        let deep = s.scan(&[PathBuf::from("/site")], true, None).unwrap();
        assert!(deep.contains("P(10px)"));
    }

    #[test]
    fn excluded_files_contribute_nothing_and_are_reported() {
        let fs = tree();
        let report = scanner(&fs, &["*.min.js"])
            .scan_report(&[PathBuf::from("/site")], true, None)
            .unwrap();

        assert!(!report.tokens.contains("Op(0)"));
        assert_eq!(report.excluded, vec![PathBuf::from("/site/app.min.js")]);
        assert_eq!(report.scanned.len(), 3);
    }

    #[test]
    fn exclusion_applies_to_explicit_files_too() {
        let fs = tree();
        let tokens = scanner(&fs, &["*.min.js"])
            .scan(&[PathBuf::from("/site/app.min.js")], false, None)
            .unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn relative_inputs_resolve_against_base_dir() {
        let fs = tree();
        let tokens = scanner(&fs, &[])
            .scan(&[PathBuf::from("a.html")], false, Some(Path::new("/site")))
            .unwrap();
        assert_eq!(tokens.to_vec(), vec!["D(b)", "M(0)"]);
    }

    #[test]
    fn missing_input_fails_with_its_path() {
        let fs = tree();
        let err = scanner(&fs, &[])
            .scan(
                &[PathBuf::from("/site/a.html"), PathBuf::from("/site/gone.html")],
                false,
                None,
            )
            .unwrap_err();

        match err {
            AtomizerError::ScanError { path, .. } => assert_eq!(path, PathBuf::from("/site/gone.html")),
            other => panic!("expected ScanError, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_file_and_unlistable_dir_fail_the_scan() {
        let fs = tree();
        fs.deny("/site/b.html");
        let err = scanner(&fs, &[]).scan(&[PathBuf::from("/site")], false, None).unwrap_err();
        assert!(matches!(err, AtomizerError::ScanError { ref path, .. } if path.ends_with("b.html")));

        let fs = tree();
        fs.deny("/site/nested");
        let err = scanner(&fs, &[]).scan(&[PathBuf::from("/site")], true, None).unwrap_err();
        assert!(matches!(err, AtomizerError::ScanError { ref path, .. } if path.ends_with("nested")));
    }

    #[test]
    fn discover_lists_files_without_filtering() {
        let fs = tree();
        let files = discover_files(&fs, &[PathBuf::from("/site")], true, None).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/site/a.html"),
                PathBuf::from("/site/app.min.js"),
                PathBuf::from("/site/b.html"),
                PathBuf::from("/site/nested/deep.html"),
            ]
        );
    }
}
