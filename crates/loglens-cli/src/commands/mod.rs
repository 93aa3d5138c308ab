//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`scan`] - Error records and tokens for logs
//! - [`open`] - Jump from a log line to source
//! - [`resolve`] - File lookup across repositories
//! - [`pin`] - Version pinning
//! - [`check`] - Configuration validation

pub mod check;
pub mod open;
pub mod pin;
pub mod resolve;
pub mod scan;

pub use check::CheckCommand;
pub use open::OpenCommand;
pub use pin::PinCommand;
pub use resolve::ResolveCommand;
pub use scan::ScanCommand;

use std::path::Path;

use loglens_nav::AnalysisSession;

use crate::error::CliError;
use crate::settings::Settings;

/// Builds an analysis session from the configured rules and theme.
fn session(settings: &Settings) -> Result<AnalysisSession, CliError> {
    let rules = settings.load_rules()?.rule_set;
    Ok(AnalysisSession::new(rules, settings.load_legend())
        .with_default_version(settings.default_version.clone()))
}

/// Reads a log, naming the file in the error.
fn read_log(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::InvalidArgument(format!("cannot read log '{}': {e}", path.display()))
    })
}
