//! CLI error types.

use std::fmt;

use loglens_nav::NavError;
use loglens_repo::RepoError;
use loglens_rules::RuleError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or unreadable settings.
    Config(String),
    /// The rule or theme configuration could not be loaded.
    Rules(RuleError),
    /// Command execution failed.
    Command(String),
    /// A requested file or repository does not exist.
    NotFound(String),
    /// Output formatting error.
    Format(String),
    /// Invalid argument.
    InvalidArgument(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Rules(e) => write!(f, "rule configuration error: {e}"),
            Self::Command(msg) => write!(f, "command error: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RuleError> for CliError {
    fn from(err: RuleError) -> Self {
        Self::Rules(err)
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        Self::Command(err.to_string())
    }
}

impl From<NavError> for CliError {
    fn from(err: NavError) -> Self {
        match err {
            NavError::Editor(e) => Self::Io(e),
            other => Self::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_config() {
        let err = CliError::Config("missing rules".into());
        assert_eq!(err.to_string(), "configuration error: missing rules");
    }

    #[test]
    fn cli_error_display_not_found() {
        let err = CliError::NotFound("main.c".into());
        assert_eq!(err.to_string(), "not found: main.c");
    }

    #[test]
    fn cli_error_from_rule_error_keeps_source() {
        let err = CliError::from(RuleError::NotAnObject("rule configuration"));
        assert!(matches!(err, CliError::Rules(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn cli_error_from_nav_editor_error_is_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err = CliError::from(NavError::Editor(io_err));
        assert!(matches!(err, CliError::Io(_)));
    }
}
