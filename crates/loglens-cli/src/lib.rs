//! # loglens-cli
//!
//! The `loglens` command-line interface.
//!
//! Provides commands for:
//! - Scanning logs for error records and highlight tokens
//! - Jumping from a log line to the source file it references
//! - Looking up files across configured repositories
//! - Pinning a repository to a version tag
//! - Checking a rule configuration
//!
//! Settings come from a TOML file (see [`settings::Settings`]) and are
//! overridden by command-line flags.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod host;
pub mod output;
pub mod settings;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
pub use settings::Settings;
