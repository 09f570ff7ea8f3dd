// src/scan/mod.rs

//! Corpus scanning.
//!
//! - [`exclude`] decides which files are skipped.
//! - [`extract`] turns file contents into tokens.
//! - [`scanner`] walks the inputs and aggregates tokens in a stable order.

pub mod exclude;
pub mod extract;
pub mod scanner;

pub use exclude::{ExclusionFilter, is_excluded};
pub use extract::{ClassAttributeExtractor, TokenExtractor};
pub use scanner::{CorpusScanner, ScanReport, discover_files};
