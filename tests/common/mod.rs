#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use atomizer_watch::fs::mock::MockFileSystem;
use atomizer_watch::scan::{ClassAttributeExtractor, CorpusScanner, ExclusionFilter};

/// Scanner over `fs` with the default class-attribute extractor.
pub fn mock_scanner(fs: &MockFileSystem, exclude: &[&str]) -> CorpusScanner {
    CorpusScanner::new(
        Arc::new(fs.clone()),
        Arc::new(ClassAttributeExtractor::new()),
        ExclusionFilter::new(exclude),
    )
}

/// Write `content` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
