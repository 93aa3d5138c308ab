//! Scan command implementation.

use std::io::Write;

use tracing::info;

use crate::cli::ScanArgs;
use crate::commands::{read_log, session};
use crate::error::CliError;
use crate::output::{DocumentReport, OutputFormat, ScanReport, TokenRow};
use crate::settings::Settings;

/// Scan command executor.
pub struct ScanCommand<'a> {
    settings: &'a Settings,
}

impl<'a> ScanCommand<'a> {
    /// Create a new scan command.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules or a log cannot be read, or output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat, args: &ScanArgs) -> Result<(), CliError> {
        let report = self.scan(args)?;
        format.write(writer, &report)
    }

    /// Classify every log in `args`.
    ///
    /// A log given twice is registered once; its second entry repeats the
    /// first registration's errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules or a log cannot be read.
    pub fn scan(&self, args: &ScanArgs) -> Result<ScanReport, CliError> {
        let session = session(self.settings)?;
        let version = args.tag.as_deref();
        let mut documents = Vec::with_capacity(args.logs.len());

        for path in &args.logs {
            let text = read_log(path)?;
            let key = path.display().to_string();
            let analysis = session.analyze(&key, &text, version);
            let registered_version = session
                .registry()
                .get(&key)
                .map_or_else(|| session.default_version().to_string(), |log| log.version);

            let (tokens, encoded) = if args.tokens {
                let legend = session.legend();
                let rows = analysis
                    .tokens
                    .iter()
                    .map(|t| TokenRow {
                        line: t.line_index,
                        column: t.start_column,
                        length: t.length,
                        category: t.category.clone(),
                        token_type: legend.token_type(&t.category),
                    })
                    .collect();
                (Some(rows), Some(legend.encode(&analysis.tokens)))
            } else {
                (None, None)
            };

            info!(document = %key, errors = analysis.errors.len(), "log scanned");
            documents.push(DocumentReport {
                document: key,
                version: registered_version,
                errors: analysis.errors,
                tokens,
                encoded,
            });
        }

        Ok(ScanReport { documents })
    }
}
