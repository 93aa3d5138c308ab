//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::PathBuf;

use loglens_repo::RepositoryRoot;
use loglens_rules::ErrorRecord;
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A highlight token with its legend index.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRow {
    /// Zero-based line.
    pub line: u32,
    /// Zero-based start column.
    pub column: u32,
    /// Span length.
    pub length: u32,
    /// Display category.
    pub category: String,
    /// Legend index of the category.
    pub token_type: u32,
}

/// Scan result for one log.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    /// Document key (the path as given).
    pub document: String,
    /// Version label the errors are registered under.
    pub version: String,
    /// Error records for the panel.
    pub errors: Vec<ErrorRecord>,
    /// Highlight tokens, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenRow>>,
    /// Relative token encoding for a semantic-token renderer, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded: Option<Vec<u32>>,
}

/// Scan result for all logs.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// One entry per log, in command-line order.
    pub documents: Vec<DocumentReport>,
}

impl TableDisplay for ScanReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for (i, doc) in self.documents.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "{} (version {})", doc.document, doc.version)?;
            writeln!(writer, "{}", "═".repeat(64))?;

            if doc.errors.is_empty() {
                writeln!(writer, "No errors found")?;
            } else {
                writeln!(writer, "{:>6}  {:>6}  {:<24}  MESSAGE", "LINE", "COLUMN", "SOURCE")?;
                writeln!(writer, "{}", "─".repeat(64))?;
                for record in &doc.errors {
                    let source = record
                        .source_reference
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |r| format!("{}:{}", r.file_path, r.line_number));
                    writeln!(
                        writer,
                        "{:>6}  {:>6}  {:<24}  {}",
                        record.line_index,
                        record.start_column,
                        truncate(&source, 24),
                        record.content
                    )?;
                }
                writeln!(writer)?;
                writeln!(writer, "Total: {} error(s)", doc.errors.len())?;
            }

            if let Some(tokens) = &doc.tokens {
                writeln!(writer)?;
                writeln!(writer, "{:>6}  {:>6}  {:>6}  {:>4}  CATEGORY", "LINE", "COLUMN", "LENGTH", "TYPE")?;
                writeln!(writer, "{}", "─".repeat(64))?;
                for token in tokens {
                    writeln!(
                        writer,
                        "{:>6}  {:>6}  {:>6}  {:>4}  {}",
                        token.line, token.column, token.length, token.token_type, token.category
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Where `open` sent the editor.
#[derive(Debug, Clone, Serialize)]
pub struct OpenLocation {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

impl TableDisplay for OpenLocation {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}:{}:{}", self.path.display(), self.line, self.column)?;
        Ok(())
    }
}

/// Result of a file lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    /// Base name that was searched for.
    pub name: String,
    /// Matching file.
    pub file: Option<PathBuf>,
    /// Repository owning the file.
    pub repository: Option<PathBuf>,
    /// Number of roots searched.
    pub roots_searched: usize,
}

impl TableDisplay for ResolveReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match (&self.file, &self.repository) {
            (Some(file), Some(repo)) => {
                writeln!(writer, "File:        {}", file.display())?;
                writeln!(writer, "Repository:  {}", repo.display())?;
            }
            _ => writeln!(
                writer,
                "{} not found in {} repositor{}",
                self.name,
                self.roots_searched,
                if self.roots_searched == 1 { "y" } else { "ies" }
            )?,
        }
        Ok(())
    }
}

/// Result of pinning a repository.
#[derive(Debug, Clone, Serialize)]
pub struct PinReport {
    /// Repository key.
    pub repository: String,
    /// Requested version.
    pub version: String,
    /// Whether the tag is checked out.
    pub pinned: bool,
    /// Human-readable outcome.
    pub outcome: String,
}

impl TableDisplay for PinReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let status = if self.pinned { "ok" } else { "failed" };
        writeln!(writer, "{} @ {}: {} ({})", self.repository, self.version, status, self.outcome)?;
        Ok(())
    }
}

/// One active rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleRow {
    /// Rule name.
    pub name: String,
    /// Pattern source.
    pub pattern: String,
    /// Display category.
    pub category: String,
    /// Legend index of the category.
    pub token_type: u32,
    /// Whether matches become error records.
    pub panel: bool,
    /// Whether matches carry source references.
    pub jump: bool,
}

/// Result of checking the configuration.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// Active rules in application order.
    pub rules: Vec<RuleRow>,
    /// Rules that were dropped, with the reason.
    pub dropped: Vec<String>,
    /// Legend categories in index order.
    pub categories: Vec<String>,
    /// Configured repositories.
    pub repositories: Vec<RepositoryRoot>,
}

impl TableDisplay for CheckReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.rules.is_empty() {
            writeln!(writer, "No active rules")?;
        } else {
            writeln!(
                writer,
                "{:<16}  {:<12}  {:>4}  {:<5}  {:<4}  PATTERN",
                "RULE", "CATEGORY", "TYPE", "PANEL", "JUMP"
            )?;
            writeln!(writer, "{}", "─".repeat(72))?;
            for rule in &self.rules {
                writeln!(
                    writer,
                    "{:<16}  {:<12}  {:>4}  {:<5}  {:<4}  {}",
                    truncate(&rule.name, 16),
                    truncate(&rule.category, 12),
                    rule.token_type,
                    yes_no(rule.panel),
                    yes_no(rule.jump),
                    rule.pattern
                )?;
            }
        }

        if !self.dropped.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Dropped ({}):", self.dropped.len())?;
            for reason in &self.dropped {
                writeln!(writer, "  - {reason}")?;
            }
        }

        writeln!(writer)?;
        if self.categories.is_empty() {
            writeln!(writer, "Theme: none (colors disabled)")?;
        } else {
            writeln!(writer, "Theme: {}", self.categories.join(", "))?;
        }

        if self.repositories.is_empty() {
            writeln!(writer, "Repositories: none")?;
        } else {
            writeln!(writer, "Repositories:")?;
            for repo in &self.repositories {
                writeln!(writer, "  {:<12}  {}", repo.key, repo.path.display())?;
            }
        }
        Ok(())
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Truncate a string to `max_len` characters with an ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_rules::SourceReference;

    fn scan_report() -> ScanReport {
        ScanReport {
            documents: vec![DocumentReport {
                document: "build.log".into(),
                version: "1.0.0".into(),
                errors: vec![ErrorRecord {
                    line_index: 2,
                    start_column: 0,
                    content: "ERROR: failed at core.rs:17".into(),
                    source_reference: Some(SourceReference {
                        file_path: "core.rs".into(),
                        line_number: 17,
                    }),
                }],
                tokens: None,
                encoded: None,
            }],
        }
    }

    #[test]
    fn scan_table_lists_errors() {
        let out = OutputFormat::default().to_string(&scan_report()).expect("format");
        assert!(out.starts_with("build.log (version 1.0.0)"));
        assert!(out.contains("core.rs:17"));
        assert!(out.contains("Total: 1 error(s)"));
    }

    #[test]
    fn scan_json_uses_record_field_names() {
        let out = OutputFormat::new(Format::Json).to_string(&scan_report()).expect("format");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
        let record = &value["documents"][0]["errors"][0];
        assert_eq!(record["lineIndex"], 2);
        assert_eq!(record["sourceReference"]["filePath"], "core.rs");
        assert!(value["documents"][0].get("tokens").is_none());
    }

    #[test]
    fn open_location_prints_grep_style() {
        let location = OpenLocation {
            path: PathBuf::from("/src/core.rs"),
            line: 17,
            column: 1,
        };
        assert_eq!(OutputFormat::default().to_string(&location).expect("format"), "/src/core.rs:17:1\n");
    }

    #[test]
    fn resolve_not_found_message() {
        let report = ResolveReport {
            name: "main.c".into(),
            file: None,
            repository: None,
            roots_searched: 1,
        };
        let out = OutputFormat::default().to_string(&report).expect("format");
        assert_eq!(out, "main.c not found in 1 repository\n");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("日本語のファイル", 5), "日本...");
        assert_eq!(truncate("hello", 3), "hel");
    }
}
