// src/scan/extract.rs

//! Token extraction: turning file contents into candidate class names.
//!
//! The scanner only depends on the [`TokenExtractor`] trait; what counts as a
//! usable class name is decided later by the generator.

use anyhow::{Context, Result};
use regex::Regex;

use crate::types::TokenSet;

/// Matches `class="..."`, `className='...'` and back-tick variants and
/// captures the attribute value.
const CLASS_ATTRIBUTE_PATTERN: &str =
    r#"(?:class|className)\s*=\s*(?:"([^"]*)"|'([^']*)'|`([^`]*)`)"#;

pub trait TokenExtractor: Send + Sync {
    /// Extract the tokens of one file's content, in order of appearance.
    fn extract(&self, content: &str) -> Result<TokenSet>;
}

/// Regex-based extractor splitting matched attribute values on whitespace.
#[derive(Debug, Clone)]
pub struct ClassAttributeExtractor {
    pattern: Regex,
}

impl ClassAttributeExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(CLASS_ATTRIBUTE_PATTERN).expect("built-in class pattern is valid"),
        }
    }

    /// Use a custom pattern. Every non-empty capture group (or the whole
    /// match if the pattern has no groups) is split on whitespace.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let pattern =
            Regex::new(pattern).with_context(|| format!("compiling token pattern {pattern:?}"))?;
        Ok(Self { pattern })
    }
}

impl Default for ClassAttributeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenExtractor for ClassAttributeExtractor {
    fn extract(&self, content: &str) -> Result<TokenSet> {
        let mut tokens = TokenSet::new();

        for caps in self.pattern.captures_iter(content) {
            let groups: Vec<&str> = if caps.len() > 1 {
                caps.iter().skip(1).flatten().map(|m| m.as_str()).collect()
            } else {
                caps.get(0).map(|m| m.as_str()).into_iter().collect()
            };

            for value in groups {
                tokens.extend(value.split_ascii_whitespace());
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_double_quoted_class() {
        let tokens = ClassAttributeExtractor::new()
            .extract(r#"<div class="Bgc(#0af)"></div>"#)
            .unwrap();
        assert_eq!(tokens.to_vec(), vec!["Bgc(#0af)"]);
    }

    #[test]
    fn extracts_jsx_and_single_quotes_in_order() {
        let src = r#"
            <a className='D(ib) C(red)'>x</a>
            <b class = "C(red) P(10px)">y</b>
            const s = `nope`; <i className=`Fz(s)`/>
        "#;
        let tokens = ClassAttributeExtractor::new().extract(src).unwrap();
        assert_eq!(tokens.to_vec(), vec!["D(ib)", "C(red)", "P(10px)", "Fz(s)"]);
    }

    #[test]
    fn custom_pattern_uses_capture_group() {
        let extractor = ClassAttributeExtractor::with_pattern(r#"cx\("([^"]*)"\)"#).unwrap();
        let tokens = extractor.extract(r#"cx("M(0) Ta(c)") cx("M(0)")"#).unwrap();
        assert_eq!(tokens.to_vec(), vec!["M(0)", "Ta(c)"]);
    }

    #[test]
    fn custom_pattern_without_groups_uses_whole_match() {
        let extractor = ClassAttributeExtractor::with_pattern(r"[A-Z][a-z]*\([^)]*\)").unwrap();
        let tokens = extractor.extract("foo Bd(n) bar H(100%)").unwrap();
        assert_eq!(tokens.to_vec(), vec!["Bd(n)", "H(100%)"]);
    }
}
