//! Open command implementation.

use std::io::Write;
use std::sync::Arc;

use loglens_nav::{NavigationOutcome, Notifier, ReferenceNavigator};

use crate::cli::OpenArgs;
use crate::commands::{read_log, session};
use crate::error::CliError;
use crate::host::TerminalEditor;
use crate::output::OutputFormat;
use crate::settings::Settings;

/// Open command executor.
pub struct OpenCommand<'a> {
    settings: &'a Settings,
}

impl<'a> OpenCommand<'a> {
    /// Create a new open command.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the open command.
    ///
    /// The location goes to `writer`; warnings and the missing-file message
    /// go to `notifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read, the line carries no
    /// source reference, or the file is not in any repository.
    pub async fn execute<W, N>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        notifier: &N,
        args: &OpenArgs,
    ) -> Result<(), CliError>
    where
        W: Write,
        N: Notifier,
    {
        let session = session(self.settings)?;
        let text = read_log(&args.log)?;
        let key = args.log.display().to_string();
        session.analyze(&key, &text, args.tag.as_deref());

        let navigator = ReferenceNavigator::new(
            Arc::clone(session.registry()),
            self.settings.resolver(),
            self.settings.runner(),
        );
        let editor = TerminalEditor::new(writer, format.clone());

        match navigator.open(&key, args.line, &editor, notifier).await? {
            NavigationOutcome::Found { .. } => Ok(()),
            NavigationOutcome::NoReference => Err(CliError::NotFound(format!(
                "line {} of {key} has no error with a source reference",
                args.line
            ))),
            NavigationOutcome::SourceFileMissing { file_path } => Err(CliError::NotFound(format!(
                "{file_path} in {} repositor{}",
                self.settings.repositories.len(),
                if self.settings.repositories.len() == 1 { "y" } else { "ies" }
            ))),
        }
    }
}
