//! Error types for repository lookup and git execution.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from running an external git command.
///
/// Version pinning treats every variant as "no useful output".
#[derive(Debug, Error)]
pub enum CommandError {
    /// An argument was rejected before anything ran.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Which input was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The process could not be started.
    #[error("command execution failed: {message}")]
    ExecutionFailed {
        /// Description of the failure.
        message: String,
    },

    /// The process exited with a non-zero status.
    #[error("command '{command}' exited with code {exit_code}: {stderr}")]
    NonZeroExit {
        /// The command that was executed.
        command: String,
        /// The exit code (`-1` if killed by a signal).
        exit_code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// The process did not finish in time and was killed.
    #[error("command '{command}' timed out after {after:?}")]
    TimedOut {
        /// The command that was executed.
        command: String,
        /// The configured timeout.
        after: Duration,
    },
}

impl CommandError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Check if this error was raised before the process started.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Errors from searching repository roots.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A configured repository root could not be listed.
    #[error("repository root '{}' is unreadable: {source}", path.display())]
    RootUnreadable {
        /// The root directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, RepoError>;
