//! Resolve command implementation.

use std::io::Write;

use crate::error::CliError;
use crate::output::{OutputFormat, ResolveReport};
use crate::settings::Settings;

/// Resolve command executor.
pub struct ResolveCommand<'a> {
    settings: &'a Settings,
}

impl<'a> ResolveCommand<'a> {
    /// Create a new resolve command.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the resolve command. Exits with an error when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository root is unreadable, the file is not
    /// found, or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, name: &str) -> Result<(), CliError> {
        let report = self.resolve(name)?;
        format.write(writer, &report)?;
        if report.file.is_none() {
            return Err(CliError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Look `name` up across the configured repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing and a root is unreadable.
    pub fn resolve(&self, name: &str) -> Result<ResolveReport, CliError> {
        let resolver = self.settings.resolver();
        let found = resolver.find_file(name)?;
        Ok(ResolveReport {
            name: name.to_string(),
            file: found.as_ref().map(|l| l.absolute_file_path.clone()),
            repository: found.map(|l| l.owner_repository_path),
            roots_searched: resolver.roots().len(),
        })
    }
}
