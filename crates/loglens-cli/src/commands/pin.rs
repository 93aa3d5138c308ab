//! Pin command implementation.

use std::io::Write;

use loglens_repo::VersionPinner;

use crate::error::CliError;
use crate::output::{OutputFormat, PinReport};
use crate::settings::Settings;

/// Pin command executor.
pub struct PinCommand<'a> {
    settings: &'a Settings,
}

impl<'a> PinCommand<'a> {
    /// Create a new pin command.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the pin command.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository key is unknown or the tag could
    /// not be checked out.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        repository: &str,
        version: &str,
    ) -> Result<(), CliError> {
        let resolver = self.settings.resolver();
        let root = resolver
            .root(repository)
            .ok_or_else(|| CliError::InvalidArgument(format!("unknown repository key '{repository}'")))?;

        let outcome = VersionPinner::new(self.settings.runner()).pin(&root.path, version).await;
        let report = PinReport {
            repository: repository.to_string(),
            version: version.to_string(),
            pinned: outcome.is_pinned(),
            outcome: outcome.to_string(),
        };
        format.write(writer, &report)?;

        if report.pinned {
            Ok(())
        } else {
            Err(CliError::Command(format!("could not pin {repository} to {version}: {outcome}")))
        }
    }
}
