//! Core types produced by classification and extraction.

use serde::{Deserialize, Serialize};

/// A single classified span on one line.
///
/// Columns and lengths are counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedToken {
    /// Zero-based line index within the document.
    pub line_index: u32,
    /// Zero-based column where the span starts.
    pub start_column: u32,
    /// Span length.
    pub length: u32,
    /// Display category, resolved to a token type by the legend.
    pub category: String,
}

/// A `(file, line)` pair embedded in a log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    /// The path as it appeared in the log, not resolved to disk.
    pub file_path: String,
    /// One-based line number.
    pub line_number: u32,
}

impl SourceReference {
    /// Returns the final path component, accepting `/` and `\` separators.
    ///
    /// A path without separators is its own base name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }

    /// Returns the zero-based line this reference points at.
    #[must_use]
    pub const fn zero_based_line(&self) -> u32 {
        self.line_number.saturating_sub(1)
    }
}

/// A structured error extracted from a classified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Zero-based line index within the document.
    pub line_index: u32,
    /// Column where the display text starts.
    pub start_column: u32,
    /// Line text from `start_column` to the end of the line.
    pub content: String,
    /// Back-reference to source code, when the rule is jump-eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<SourceReference>,
}

/// The unstripped match of a panel-eligible rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFragment {
    /// Name of the rule that matched.
    pub rule_name: String,
    /// The full regex match, without prefix stripping or suffix trimming.
    pub matched_text: String,
    /// Column of the display text (same as the emitted token).
    pub start_column: u32,
}

/// Result of classifying one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClassification {
    /// Highlight spans, one per matching rule.
    pub tokens: Vec<ParsedToken>,
    /// Fragments for panel-eligible rules, in rule order.
    pub fragments: Vec<RawFragment>,
}

/// Result of extracting a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentExtraction {
    /// Token stream sorted by `(line_index, start_column)`.
    pub tokens: Vec<ParsedToken>,
    /// Error records in line order, then rule order.
    pub errors: Vec<ErrorRecord>,
}
