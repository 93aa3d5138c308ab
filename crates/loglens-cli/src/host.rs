//! Terminal stand-ins for the editor and message window.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;

use loglens_nav::{Editor, Notifier};

use crate::output::{OpenLocation, OutputFormat};

/// "Opens" a file by printing `path:line:column` (one-based) so terminals
/// and editors can follow it.
pub struct TerminalEditor<W> {
    writer: RefCell<W>,
    format: OutputFormat,
}

impl<W: Write> TerminalEditor<W> {
    /// Create an editor that prints to `writer`.
    pub const fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer: RefCell::new(writer),
            format,
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> Editor for TerminalEditor<W> {
    fn open_at(&self, path: &Path, line: u32, column: u32) -> io::Result<()> {
        let location = OpenLocation {
            path: path.to_path_buf(),
            line: line.saturating_add(1),
            column: column.saturating_add(1),
        };
        self.format
            .write(&mut *self.writer.borrow_mut(), &location)
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Prints user-facing messages to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}
