//! Theme legend: display category names to renderer token types.
//!
//! The theme configuration is a JSON object keyed by category name. Only the
//! key order matters here; the values are passed through untouched.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ParsedToken;

/// Ordered category legend built from a theme configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeLegend {
    categories: Vec<String>,
    styles: Map<String, Value>,
}

impl ThemeLegend {
    /// Parses a theme configuration.
    ///
    /// Blank text or a non-object document yields an empty legend.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            warn!("theme configuration is empty, colors disabled");
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Builds a legend from a parsed theme document.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(styles) = value else {
            warn!("theme configuration is not an object, colors disabled");
            return Self::default();
        };

        let categories: Vec<String> = styles.keys().cloned().collect();
        debug!(categories = categories.len(), "theme legend built");
        Self { categories, styles }
    }

    /// Category names in legend order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Opaque style values for the renderer.
    #[must_use]
    pub const fn styles(&self) -> &Map<String, Value> {
        &self.styles
    }

    /// Returns true if the legend has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Token type index for a category; unknown categories map to `0`.
    #[must_use]
    pub fn token_type(&self, category: &str) -> u32 {
        self.categories
            .iter()
            .position(|c| c == category)
            .map_or(0, |i| i as u32)
    }

    /// Encodes tokens as relative `[deltaLine, deltaStart, length, type, modifiers]` groups.
    ///
    /// Tokens are encoded in line and column order; tokens at the same
    /// position keep their input order.
    #[must_use]
    pub fn encode(&self, tokens: &[ParsedToken]) -> Vec<u32> {
        let mut ordered: Vec<&ParsedToken> = tokens.iter().collect();
        ordered.sort_by_key(|t| (t.line_index, t.start_column));

        let mut data = Vec::with_capacity(ordered.len() * 5);
        let mut prev_line = 0;
        let mut prev_start = 0;

        for token in ordered {
            let delta_line = token.line_index - prev_line;
            let delta_start = if delta_line == 0 {
                token.start_column - prev_start
            } else {
                token.start_column
            };

            data.extend_from_slice(&[
                delta_line,
                delta_start,
                token.length,
                self.token_type(&token.category),
                0,
            ]);

            prev_line = token.line_index;
            prev_start = token.start_column;
        }

        data
    }
}
