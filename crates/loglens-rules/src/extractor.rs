//! Document-level extraction of tokens and error records.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::classifier::LineClassifier;
use crate::rule::{char_to_byte, RuleSet};
use crate::types::{DocumentExtraction, ErrorRecord, RawFragment, SourceReference};

/// Any of the three line-break conventions.
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap_or_else(|_| unreachable!()));

/// A word followed by `:digits` at the very end of the text.
static TRAILING_LINE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S*):(\d+)$").unwrap_or_else(|_| unreachable!()));

/// Outcome of looking for a trailing `file:line` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceParse {
    /// No trailing `:digits`, or nothing in front of it.
    Absent,
    /// A usable reference.
    Found(SourceReference),
    /// Trailing digits that are not a positive line number.
    Unparsable(String),
}

/// Looks for a trailing `path:line` in the raw matched text.
///
/// The path is the whitespace-delimited word directly before the colon.
#[must_use]
pub fn parse_source_reference(matched: &str) -> ReferenceParse {
    let Some(caps) = TRAILING_LINE_REF.captures(matched) else {
        return ReferenceParse::Absent;
    };

    let file_path = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2).map_or("", |m| m.as_str());

    if file_path.is_empty() {
        return ReferenceParse::Absent;
    }

    match digits.parse::<u32>() {
        Ok(line_number) if line_number >= 1 => ReferenceParse::Found(SourceReference {
            file_path: file_path.to_string(),
            line_number,
        }),
        _ => ReferenceParse::Unparsable(digits.to_string()),
    }
}

/// Splits text on `\r\n`, `\r` or `\n`.
///
/// A trailing line break produces a final empty line, so line indices match
/// what an editor displays.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_BREAK.split(text).collect()
}

/// Drives the [`LineClassifier`] across a whole document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentExtractor<'r> {
    rules: &'r RuleSet,
}

impl<'r> DocumentExtractor<'r> {
    /// Creates an extractor over the given rules.
    #[must_use]
    pub const fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Extracts the token stream and error records of a document.
    #[must_use]
    pub fn extract(&self, text: &str) -> DocumentExtraction {
        let mut extraction = DocumentExtraction::default();
        if self.rules.is_empty() {
            return extraction;
        }

        let classifier = LineClassifier::new(self.rules);

        for (index, line) in split_lines(text).into_iter().enumerate() {
            let line_index = index as u32;
            let mut classified = classifier.classify(line_index, line);

            // Stable: rules that start on the same column keep their order.
            classified.tokens.sort_by_key(|t| t.start_column);
            extraction.tokens.append(&mut classified.tokens);

            for fragment in &classified.fragments {
                if let Some(record) = self.record_for(line_index, line, fragment) {
                    extraction.errors.push(record);
                }
            }
        }

        debug!(
            tokens = extraction.tokens.len(),
            errors = extraction.errors.len(),
            "document extracted"
        );
        extraction
    }

    fn record_for(&self, line_index: u32, line: &str, fragment: &RawFragment) -> Option<ErrorRecord> {
        let content = line[char_to_byte(line, fragment.start_column as usize)..].to_string();

        let source_reference = if self.rules.is_jump_eligible(&fragment.rule_name) {
            match parse_source_reference(&fragment.matched_text) {
                ReferenceParse::Found(reference) => Some(reference),
                ReferenceParse::Absent => None,
                ReferenceParse::Unparsable(digits) => {
                    debug!(
                        rule = %fragment.rule_name,
                        line = line_index,
                        digits = %digits,
                        "dropping record with unparsable line number"
                    );
                    return None;
                }
            }
        } else {
            None
        };

        trace!(line = line_index, has_reference = source_reference.is_some(), "error record");

        Some(ErrorRecord {
            line_index,
            start_column: fragment.start_column,
            content,
            source_reference,
        })
    }
}

/// Extracts a document with the given rules.
#[must_use]
pub fn extract_document(text: &str, rules: &RuleSet) -> DocumentExtraction {
    DocumentExtractor::new(rules).extract(text)
}
