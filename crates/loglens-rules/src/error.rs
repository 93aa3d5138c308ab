//! Error types for rule configuration.

use thiserror::Error;

/// Errors raised while building a rule set or theme legend.
///
/// Per-rule variants never abort a build: the offending rule is dropped and
/// the error is reported alongside the rules that survived.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A highlight entry is missing a mandatory field.
    #[error("rule '{rule}' is missing required field '{field}'")]
    MissingField {
        /// Name of the rule.
        rule: String,
        /// The missing field (`regex` or `theme`).
        field: &'static str,
    },

    /// The rule's regular expression failed to compile.
    #[error("rule '{rule}' has an invalid pattern: {reason}")]
    InvalidPattern {
        /// Name of the rule.
        rule: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A highlight entry has fields of the wrong shape.
    #[error("rule '{rule}' is malformed: {reason}")]
    InvalidDefinition {
        /// Name of the rule.
        rule: String,
        /// Description of the problem.
        reason: String,
    },

    /// The configuration document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A document or group that must be a JSON object is not one.
    #[error("expected a JSON object for {0}")]
    NotAnObject(&'static str),
}

impl RuleError {
    /// Returns the name of the rule this error refers to, if any.
    #[must_use]
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::MissingField { rule, .. }
            | Self::InvalidPattern { rule, .. }
            | Self::InvalidDefinition { rule, .. } => Some(rule),
            Self::Json(_) | Self::NotAnObject(_) => None,
        }
    }
}

/// Result type alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RuleError::MissingField {
            rule: "ERR".to_string(),
            field: "regex",
        };
        assert_eq!(err.to_string(), "rule 'ERR' is missing required field 'regex'");

        let err = RuleError::NotAnObject("highlight");
        assert_eq!(err.to_string(), "expected a JSON object for highlight");
    }

    #[test]
    fn rule_name_only_for_rule_errors() {
        let err = RuleError::InvalidPattern {
            rule: "WARN".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(err.rule_name(), Some("WARN"));
        assert_eq!(RuleError::NotAnObject("rules").rule_name(), None);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleError>();
    }
}
