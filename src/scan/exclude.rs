// src/scan/exclude.rs

use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

/// Compiled exclusion patterns for one scan.
///
/// A path is excluded when its base name *or* its full (absolute) path
/// matches any pattern, so `*.min.js` works regardless of directory while
/// `**/vendor/**` can target whole subtrees. `*` and `?` never cross `/`;
/// only `**` spans directories.
///
/// Patterns that fail to compile are treated as literal strings that never
/// match. They are reported once, here, and never fail a scan.
#[derive(Clone)]
pub struct ExclusionFilter {
    set: GlobSet,
    patterns: Vec<String>,
}

impl fmt::Debug for ExclusionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionFilter")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new(&[] as &[String])
    }
}

impl ExclusionFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let pat = pat.as_ref();
            match GlobBuilder::new(pat).literal_separator(true).build() {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => {
                    warn!(pattern = %pat, error = %err, "ignoring malformed exclude pattern");
                }
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            warn!(error = %err, "failed to build exclude set; nothing will be excluded");
            GlobSet::empty()
        });

        Self {
            set,
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    /// The patterns as configured (including any malformed ones).
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        if let Some(name) = path.file_name() {
            if self.set.is_match(Path::new(name)) {
                return true;
            }
        }
        self.set.is_match(path)
    }
}

/// One-shot form: compile `patterns` and test `path`.
pub fn is_excluded<S: AsRef<str>>(path: &Path, patterns: &[S]) -> bool {
    ExclusionFilter::new(patterns).is_excluded(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_patterns_never_excludes() {
        let filter = ExclusionFilter::default();
        assert!(!filter.is_excluded(Path::new("/site/app.min.js")));
    }

    #[test]
    fn base_name_match_ignores_directory() {
        let patterns = ["*.min.js"];
        assert!(is_excluded(Path::new("/site/vendor/lib/jquery.min.js"), &patterns));
        assert!(is_excluded(Path::new("/app.min.js"), &patterns));
        assert!(!is_excluded(Path::new("/site/app.js"), &patterns));
    }

    #[test]
    fn question_mark_matches_single_char() {
        let patterns = ["page?.html"];
        assert!(is_excluded(Path::new("/site/page1.html"), &patterns));
        assert!(!is_excluded(Path::new("/site/page10.html"), &patterns));
    }

    #[test]
    fn full_path_patterns_match_subtrees() {
        let filter = ExclusionFilter::new(&["**/node_modules/**"]);
        assert!(filter.is_excluded(Path::new("/site/node_modules/pkg/index.js")));
        assert!(!filter.is_excluded(Path::new("/site/src/index.js")));
    }

    #[test]
    fn single_star_stays_within_one_component() {
        let filter = ExclusionFilter::new(&["*min*"]);
        assert!(filter.is_excluded(Path::new("/site/admin/app.min.js")));
        assert!(!filter.is_excluded(Path::new("/site/admin/app.js")));

        let filter = ExclusionFilter::new(&["/site/*.html"]);
        assert!(filter.is_excluded(Path::new("/site/index.html")));
        assert!(!filter.is_excluded(Path::new("/site/pages/index.html")));
    }

    #[test]
    fn malformed_patterns_never_match_and_never_fail() {
        let filter = ExclusionFilter::new(&["[unclosed", "*.tmp"]);
        assert!(!filter.is_excluded(Path::new("/site/[unclosed")));
        assert!(filter.is_excluded(Path::new("/site/x.tmp")));
        assert_eq!(filter.patterns().len(), 2);
    }

    #[test]
    fn exclusion_is_idempotent() {
        let filter = ExclusionFilter::new(&["*.snap", "fixtures/*"]);
        for p in ["/a/b.snap", "/a/b.html", "fixtures/x.js"] {
            let path = Path::new(p);
            let once = filter.is_excluded(path);
            assert_eq!(once, filter.is_excluded(path));
            assert_eq!(once, is_excluded(path, filter.patterns()));
        }
    }
}
