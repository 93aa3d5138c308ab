//! # loglens-rules
//!
//! Rule-driven classification of free-form log text.
//!
//! This crate provides:
//!
//! - [`RuleSet`] - Ordered, validated rule definitions built from JSON config
//! - [`LineClassifier`] - Applies every rule to one line, yielding tokens and fragments
//! - [`DocumentExtractor`] - Runs the classifier over a document and extracts [`ErrorRecord`]s
//! - [`ThemeLegend`] - Maps display categories to renderer token types
//!
//! ## Example
//!
//! ```rust
//! use loglens_rules::{extract_document, RuleSet};
//!
//! let config = r#"{
//!     "highlight": { "ERR": { "regex": "ERROR:.*", "tilEnd": true, "theme": "err" } },
//!     "panel": ["ERR"],
//!     "jump": ["ERR"]
//! }"#;
//!
//! let rules = RuleSet::from_json(config)?.rule_set;
//! let doc = extract_document("ERROR: failed at core.rs:17", &rules);
//!
//! assert_eq!(doc.tokens.len(), 1);
//! let reference = doc.errors[0].source_reference.as_ref();
//! assert_eq!(reference.map(|r| r.line_number), Some(17));
//! # Ok::<(), loglens_rules::RuleError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
pub mod error;
pub mod extractor;
pub mod legend;
pub mod rule;
pub mod types;

#[cfg(test)]
mod tests;

pub use classifier::{classify_line, LineClassifier};
pub use error::{Result, RuleError};
pub use extractor::{extract_document, parse_source_reference, split_lines, DocumentExtractor, ReferenceParse};
pub use legend::ThemeLegend;
pub use rule::{build_rule_set, RuleDefinition, RuleSet, RuleSetBuild};
pub use types::{
    DocumentExtraction, ErrorRecord, LineClassification, ParsedToken, RawFragment, SourceReference,
};
