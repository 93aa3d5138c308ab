//! Error types for navigation.

use loglens_repo::RepoError;
use thiserror::Error;

/// Errors that stop a navigation request.
///
/// Missing references, missing files and failed pinning are outcomes, not
/// errors; see [`crate::NavigationOutcome`].
#[derive(Debug, Error)]
pub enum NavError {
    /// A repository root could not be searched.
    #[error(transparent)]
    Repository(#[from] RepoError),

    /// The background file search did not complete.
    #[error("source lookup interrupted: {0}")]
    Interrupted(String),

    /// The editor could not open the resolved file.
    #[error("failed to open source file: {0}")]
    Editor(#[from] std::io::Error),
}

/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;
