//! Per-line classification.
//!
//! Every rule is applied independently to the line. The visual token is
//! derived from the stripped and trimmed display text, while the fragment
//! handed to extraction always carries the untouched regex match.

use tracing::trace;

use crate::rule::RuleSet;
use crate::types::{LineClassification, ParsedToken, RawFragment};

/// Applies a [`RuleSet`] to single lines.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'r> {
    rules: &'r RuleSet,
}

impl<'r> LineClassifier<'r> {
    /// Creates a classifier over the given rules.
    #[must_use]
    pub const fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Classifies one line.
    ///
    /// Tokens and fragments are emitted in rule-definition order; multiple
    /// rules may cover the same span.
    #[must_use]
    pub fn classify(&self, line_index: u32, line: &str) -> LineClassification {
        let mut result = LineClassification::default();
        let line_length = line.chars().count() as u32;

        for rule in self.rules.iter() {
            let Some(matched) = rule.pattern().find(line) else {
                continue;
            };

            let Some(display) = rule.display_text(matched.as_str()) else {
                trace!(rule = rule.name(), line = line_index, "match consumed by strip/trim");
                continue;
            };

            // First occurrence of the display text, which can precede the match.
            let Some(byte_start) = line.find(display) else {
                continue;
            };
            let start_column = line[..byte_start].chars().count() as u32;

            let length = if rule.extend_to_line_end() {
                line_length
            } else {
                display.chars().count() as u32
            };

            trace!(
                rule = rule.name(),
                line = line_index,
                column = start_column,
                length,
                "rule matched"
            );

            result.tokens.push(ParsedToken {
                line_index,
                start_column,
                length,
                category: rule.category().to_string(),
            });

            if self.rules.is_panel_eligible(rule.name()) {
                result.fragments.push(RawFragment {
                    rule_name: rule.name().to_string(),
                    matched_text: matched.as_str().to_string(),
                    start_column,
                });
            }
        }

        result
    }
}

/// Classifies a single line with the given rules.
#[must_use]
pub fn classify_line(line_index: u32, line: &str, rules: &RuleSet) -> LineClassification {
    LineClassifier::new(rules).classify(line_index, line)
}
