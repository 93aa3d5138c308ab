//! Collaborators provided by the host application.

use std::path::Path;

/// Opens a file at a position.
pub trait Editor {
    /// Opens `path` with the cursor at zero-based `line` and `column`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be shown.
    fn open_at(&self, path: &Path, line: u32, column: u32) -> std::io::Result<()>;
}

/// Shows user-facing messages.
pub trait Notifier {
    /// A non-fatal problem; work continues.
    fn warn(&self, message: &str);

    /// A request that could not be completed.
    fn error(&self, message: &str);
}
