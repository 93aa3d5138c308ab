//! Rule definitions and rule-set construction.
//!
//! The configuration schema has three optional groups:
//!
//! ```json
//! {
//!     "highlight": { "NAME": { "regex": "...", "char": "", "offset": 0, "tilEnd": false, "theme": "cat" } },
//!     "panel": ["NAME"],
//!     "jump": ["NAME"]
//! }
//! ```
//!
//! Rules are applied in the order they appear under `highlight`.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, RuleError};

const HIGHLIGHT_KEY: &str = "highlight";
const PANEL_KEY: &str = "panel";
const JUMP_KEY: &str = "jump";

/// One configured classification unit.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    name: String,
    pattern: Regex,
    strip_prefix: String,
    trim_suffix_len: usize,
    extend_to_line_end: bool,
    category: String,
}

impl RuleDefinition {
    /// Creates a rule with no prefix stripping, no suffix trimming, and a
    /// token that covers only the display text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if `pattern` does not compile.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        category: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
            rule: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            name,
            pattern,
            strip_prefix: String::new(),
            trim_suffix_len: 0,
            extend_to_line_end: false,
            category: category.into(),
        })
    }

    /// Sets the prefix whose length is stripped from the display text.
    #[must_use]
    pub fn with_strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = prefix.into();
        self
    }

    /// Sets the number of characters trimmed from the end of the display text.
    #[must_use]
    pub const fn with_trim_suffix(mut self, len: usize) -> Self {
        self.trim_suffix_len = len;
        self
    }

    /// Makes the token span run to the full line length.
    #[must_use]
    pub const fn with_extend_to_line_end(mut self, extend: bool) -> Self {
        self.extend_to_line_end = extend;
        self
    }

    /// Unique rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Prefix stripped from the display text (may be empty).
    #[must_use]
    pub fn strip_prefix(&self) -> &str {
        &self.strip_prefix
    }

    /// Characters trimmed from the end of the display text.
    #[must_use]
    pub const fn trim_suffix_len(&self) -> usize {
        self.trim_suffix_len
    }

    /// Whether the token extends to the line length.
    #[must_use]
    pub const fn extend_to_line_end(&self) -> bool {
        self.extend_to_line_end
    }

    /// Display category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Derives the display text from a raw match.
    ///
    /// Returns `None` when stripping and trimming would consume the whole
    /// match, which callers treat as no match.
    #[must_use]
    pub fn display_text<'m>(&self, matched: &'m str) -> Option<&'m str> {
        let prefix = self.strip_prefix.chars().count();
        let total = matched.chars().count();
        let end = total.checked_sub(self.trim_suffix_len)?;
        if prefix >= end {
            return None;
        }

        let start_byte = char_to_byte(matched, prefix);
        let end_byte = char_to_byte(matched, end);
        Some(&matched[start_byte..end_byte])
    }
}

/// Byte offset of the `n`th character, or the string length past the end.
pub(crate) fn char_to_byte(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Ordered rules plus the panel and jump subsets.
///
/// Built once per configuration load and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleDefinition>,
    panel: Vec<String>,
    jump: Vec<String>,
}

impl RuleSet {
    /// Creates a rule set, dropping duplicate rule names and stale subset names.
    ///
    /// Jump names must also be panel names to survive.
    #[must_use]
    pub fn new<P, J>(rules: Vec<RuleDefinition>, panel: P, jump: J) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        let mut unique: Vec<RuleDefinition> = Vec::with_capacity(rules.len());
        for rule in rules {
            if unique.iter().any(|r| r.name == rule.name) {
                warn!(rule = %rule.name, "duplicate rule name, keeping the first definition");
                continue;
            }
            unique.push(rule);
        }

        let mut set = Self {
            rules: unique,
            panel: Vec::new(),
            jump: Vec::new(),
        };

        for name in panel {
            let name = name.into();
            if set.contains(&name) && !set.panel.contains(&name) {
                set.panel.push(name);
            } else {
                debug!(rule = %name, "dropping panel entry with no matching rule");
            }
        }

        for name in jump {
            let name = name.into();
            if set.panel.contains(&name) && !set.jump.contains(&name) {
                set.jump.push(name);
            } else {
                debug!(rule = %name, "dropping jump entry that is not panel-eligible");
            }
        }

        set
    }

    /// Parses a JSON rule configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the text is not a JSON object; individual
    /// malformed rules are reported in [`RuleSetBuild::dropped`].
    pub fn from_json(text: &str) -> Result<RuleSetBuild> {
        let value: Value = serde_json::from_str(text)?;
        build_rule_set(&value)
    }

    /// Rules in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Returns true if a rule with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of rules whose matches surface as error records.
    #[must_use]
    pub fn panel_eligible(&self) -> &[String] {
        &self.panel
    }

    /// Names of panel rules that are checked for a source reference.
    #[must_use]
    pub fn jump_eligible(&self) -> &[String] {
        &self.jump
    }

    /// Returns true if matches of `name` become error records.
    #[must_use]
    pub fn is_panel_eligible(&self, name: &str) -> bool {
        self.panel.iter().any(|n| n == name)
    }

    /// Returns true if matches of `name` are checked for a source reference.
    #[must_use]
    pub fn is_jump_eligible(&self, name: &str) -> bool {
        self.jump.iter().any(|n| n == name)
    }

    /// Number of active rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// An empty rule set disables classification.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of building a rule set from configuration.
#[derive(Debug, Default)]
pub struct RuleSetBuild {
    /// The active rules.
    pub rule_set: RuleSet,
    /// Rules excluded from the active set, with the reason.
    pub dropped: Vec<RuleError>,
}

/// Raw highlight entry as written in the configuration.
#[derive(Debug, Deserialize)]
struct RawRule {
    regex: Option<String>,
    #[serde(rename = "char")]
    strip_prefix: Option<String>,
    offset: Option<usize>,
    #[serde(rename = "tilEnd")]
    til_end: Option<bool>,
    theme: Option<String>,
}

/// Builds a [`RuleSet`] from a parsed configuration document.
///
/// # Errors
///
/// Returns [`RuleError::NotAnObject`] if the document or its `highlight`
/// group is not a JSON object.
pub fn build_rule_set(config: &Value) -> Result<RuleSetBuild> {
    let root = config.as_object().ok_or(RuleError::NotAnObject("rule configuration"))?;

    let mut rules = Vec::new();
    let mut dropped = Vec::new();

    if let Some(highlight) = root.get(HIGHLIGHT_KEY) {
        let entries = highlight
            .as_object()
            .ok_or(RuleError::NotAnObject(HIGHLIGHT_KEY))?;

        for (name, entry) in entries {
            match parse_rule(name, entry) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    warn!(rule = %name, error = %e, "dropping highlight rule");
                    dropped.push(e);
                }
            }
        }
    }

    let rule_set = RuleSet::new(rules, name_list(root.get(PANEL_KEY)), name_list(root.get(JUMP_KEY)));

    if rule_set.is_empty() {
        warn!("rule configuration has no usable highlight rules, classification disabled");
    } else {
        debug!(
            rules = rule_set.len(),
            panel = rule_set.panel_eligible().len(),
            jump = rule_set.jump_eligible().len(),
            "rule set built"
        );
    }

    Ok(RuleSetBuild { rule_set, dropped })
}

fn parse_rule(name: &str, entry: &Value) -> Result<RuleDefinition> {
    let raw: RawRule =
        serde_json::from_value(entry.clone()).map_err(|e| RuleError::InvalidDefinition {
            rule: name.to_string(),
            reason: e.to_string(),
        })?;

    let pattern = raw.regex.ok_or_else(|| RuleError::MissingField {
        rule: name.to_string(),
        field: "regex",
    })?;
    let category = raw.theme.ok_or_else(|| RuleError::MissingField {
        rule: name.to_string(),
        field: "theme",
    })?;

    Ok(RuleDefinition::new(name, &pattern, category)?
        .with_strip_prefix(raw.strip_prefix.unwrap_or_default())
        .with_trim_suffix(raw.offset.unwrap_or(0))
        .with_extend_to_line_end(raw.til_end.unwrap_or(false)))
}

/// String entries of an optional list group; anything else is ignored.
fn name_list(group: Option<&Value>) -> Vec<String> {
    group
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
