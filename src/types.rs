// src/types.rs

//! Small value types shared across the scanner, the engine and the build
//! pipeline.

use indexmap::IndexSet;
use serde::Serialize;

/// Insertion-ordered, deduplicated set of usage tokens.
///
/// Union keeps every token at the position of its *first* occurrence, so the
/// aggregate of an ordered list of files is reproducible from run to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: IndexSet<String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token; returns `false` if it was already present (in which
    /// case its original position is kept).
    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.tokens.insert(token.into())
    }

    /// Order-stable union: append the tokens of `other` that are not yet
    /// present, in `other`'s order.
    pub fn union_with(&mut self, other: &TokenSet) {
        for token in other.iter() {
            if !self.tokens.contains(token) {
                self.tokens.insert(token.to_string());
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tokens.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        for token in iter {
            set.insert(token);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for TokenSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

/// Options forwarded to the stylesheet generator on every build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorOptions {
    /// Emit right-to-left styles (swap left/right).
    pub rtl: bool,
    /// Namespace prefix for generated selectors, e.g. `#app`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Separate namespace for helper selectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpers_namespace: Option<String>,
    /// Legacy-browser compatibility hacks.
    pub ie: bool,
}
