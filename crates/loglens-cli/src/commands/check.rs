//! Check command implementation.

use std::io::Write;

use crate::error::CliError;
use crate::output::{CheckReport, OutputFormat, RuleRow};
use crate::settings::Settings;

/// Check command executor.
pub struct CheckCommand<'a> {
    settings: &'a Settings,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be loaded, or if `strict` is set
    /// and some rule was dropped.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, strict: bool) -> Result<(), CliError> {
        let report = self.check()?;
        format.write(writer, &report)?;

        if strict && !report.dropped.is_empty() {
            return Err(CliError::Config(format!("{} rule(s) dropped", report.dropped.len())));
        }
        Ok(())
    }

    /// Build the rule set and legend and describe them.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule configuration cannot be read or parsed.
    pub fn check(&self) -> Result<CheckReport, CliError> {
        let build = self.settings.load_rules()?;
        let legend = self.settings.load_legend();
        let rules = &build.rule_set;

        Ok(CheckReport {
            rules: rules
                .iter()
                .map(|rule| RuleRow {
                    name: rule.name().to_string(),
                    pattern: rule.pattern().as_str().to_string(),
                    category: rule.category().to_string(),
                    token_type: legend.token_type(rule.category()),
                    panel: rules.is_panel_eligible(rule.name()),
                    jump: rules.is_jump_eligible(rule.name()),
                })
                .collect(),
            dropped: build.dropped.iter().map(ToString::to_string).collect(),
            categories: legend.categories().to_vec(),
            repositories: self.settings.repositories.clone(),
        })
    }
}
