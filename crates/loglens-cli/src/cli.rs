//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// loglens - log classification and source navigation.
#[derive(Parser, Debug, Clone)]
#[command(name = "loglens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file. Defaults to `loglens.toml` in the working directory
    /// when that file exists.
    #[arg(short, long, env = "LOGLENS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Rule configuration (JSON), overriding the settings file.
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    /// Theme configuration (JSON), overriding the settings file.
    #[arg(short, long, global = true)]
    pub theme: Option<PathBuf>,

    /// Extra repository root, searched after the configured ones.
    #[arg(long = "repo", value_name = "KEY=PATH", global = true)]
    pub repos: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit diagnostics as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Classify logs and list their error records.
    Scan(ScanArgs),

    /// Open the source referenced by an error line.
    Open(OpenArgs),

    /// Find a file by name across the repositories.
    Resolve {
        /// Base file name to look for.
        name: String,
    },

    /// Check out a version tag in a repository.
    Pin {
        /// Repository key from the settings or `--repo`.
        repository: String,
        /// Version tag to check out.
        version: String,
    },

    /// Validate the rule and theme configuration.
    Check {
        /// Fail if any rule was dropped.
        #[arg(long)]
        strict: bool,
    },
}

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Log files to classify.
    #[arg(required = true)]
    pub logs: Vec<PathBuf>,

    /// Also list highlight tokens with their legend index.
    #[arg(long)]
    pub tokens: bool,

    /// Version label of the code that wrote the logs.
    #[arg(long, value_name = "VERSION")]
    pub tag: Option<String>,
}

/// Arguments for the open command.
#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    /// Log file containing the error.
    pub log: PathBuf,

    /// Zero-based line of the error in the log.
    pub line: u32,

    /// Version label of the code that wrote the log.
    #[arg(long, value_name = "VERSION")]
    pub tag: Option<String>,
}
