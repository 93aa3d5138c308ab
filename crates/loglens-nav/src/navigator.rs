//! Navigation from a log line to the source it references.

use std::path::PathBuf;

use loglens_repo::{CommandRunner, PinOutcome, RepositoryResolver, VersionPinner};
use tracing::{debug, info, warn};

use crate::error::{NavError, Result};
use crate::host::{Editor, Notifier};
use crate::registry::SharedRegistry;

/// Shown when pinning fails and the current checkout is used.
pub const PIN_FALLBACK_MESSAGE: &str = "Related commit not found, use the current code instead.";

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The referenced file was found.
    Found {
        /// Absolute path of the source file.
        path: PathBuf,
        /// Zero-based target line.
        line: u32,
        /// Zero-based target column (always the start of the line).
        column: u32,
        /// What happened when pinning the owning repository.
        pin: PinOutcome,
    },
    /// The line has no error record with a source reference.
    NoReference,
    /// No configured root contains the referenced file.
    SourceFileMissing {
        /// The path as written in the log.
        file_path: String,
    },
}

impl NavigationOutcome {
    /// Message for the user when the file could not be found.
    #[must_use]
    pub fn missing_file_message(file_path: &str) -> String {
        format!("Source file: {file_path} not found.")
    }
}

/// Resolves registered error records to source files and pins their
/// repositories to the log's version.
#[derive(Debug, Clone)]
pub struct ReferenceNavigator<R> {
    registry: SharedRegistry,
    resolver: RepositoryResolver,
    pinner: VersionPinner<R>,
}

impl<R: CommandRunner> ReferenceNavigator<R> {
    /// Creates a navigator over `registry` that searches `resolver`'s roots
    /// and runs git through `runner`.
    pub const fn new(registry: SharedRegistry, resolver: RepositoryResolver, runner: R) -> Self {
        Self {
            registry,
            resolver,
            pinner: VersionPinner::new(runner),
        }
    }

    /// The registry this navigator reads from.
    pub const fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// The runner used for git commands.
    pub const fn runner(&self) -> &R {
        self.pinner.runner()
    }

    /// The configured resolver.
    pub const fn resolver(&self) -> &RepositoryResolver {
        &self.resolver
    }

    /// Resolves the error on `line_index` of `document_key`.
    ///
    /// Pinning is attempted only once the file is found; its failure is
    /// reported in the `pin` field of [`NavigationOutcome::Found`] and does not abort.
    ///
    /// # Errors
    ///
    /// Returns an error if no root contains the file and one of them could
    /// not be read, or if the background search was cancelled.
    pub async fn navigate(&self, document_key: &str, line_index: u32) -> Result<NavigationOutcome> {
        let Some(found) = self.registry.lookup(document_key, line_index) else {
            debug!(document = document_key, line = line_index, "no source reference on line");
            return Ok(NavigationOutcome::NoReference);
        };
        let Some(reference) = found.record.source_reference else {
            return Ok(NavigationOutcome::NoReference);
        };

        let base_name = reference.base_name().to_string();
        let resolver = self.resolver.clone();
        let location = tokio::task::spawn_blocking(move || resolver.find_file(&base_name))
            .await
            .map_err(|e| NavError::Interrupted(e.to_string()))??;

        let Some(location) = location else {
            warn!(file = %reference.file_path, "source file not found in any repository");
            return Ok(NavigationOutcome::SourceFileMissing {
                file_path: reference.file_path,
            });
        };

        let pin = self
            .pinner
            .pin(&location.owner_repository_path, &found.version)
            .await;

        let line = reference.zero_based_line();
        info!(
            document = document_key,
            path = %location.absolute_file_path.display(),
            line,
            pinned = pin.is_pinned(),
            "navigation resolved"
        );

        Ok(NavigationOutcome::Found {
            path: location.absolute_file_path,
            line,
            column: 0,
            pin,
        })
    }

    /// Navigates and hands the result to the host.
    ///
    /// A missing file is reported through `notifier.error`, a failed pin
    /// through `notifier.warn` before the file is opened anyway. Lines
    /// without a reference are ignored silently.
    ///
    /// # Errors
    ///
    /// Returns navigation errors from [`Self::navigate`] and editor failures.
    pub async fn open<E, N>(
        &self,
        document_key: &str,
        line_index: u32,
        editor: &E,
        notifier: &N,
    ) -> Result<NavigationOutcome>
    where
        E: Editor + ?Sized,
        N: Notifier + ?Sized,
    {
        let outcome = self.navigate(document_key, line_index).await?;

        match &outcome {
            NavigationOutcome::NoReference => {}
            NavigationOutcome::SourceFileMissing { file_path } => {
                notifier.error(&NavigationOutcome::missing_file_message(file_path));
            }
            NavigationOutcome::Found {
                path,
                line,
                column,
                pin,
            } => {
                if !pin.is_pinned() {
                    notifier.warn(PIN_FALLBACK_MESSAGE);
                }
                editor.open_at(path, *line, *column)?;
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::shared_registry;
    use loglens_repo::{CommandError, CommandOutput, GitInvocation, RepositoryRoot};
    use loglens_rules::{ErrorRecord, SourceReference};
    use parking_lot::Mutex;
    use std::path::Path;

    /// Answers every git command with the same text.
    struct FixedRunner(&'static str);

    impl CommandRunner for FixedRunner {
        async fn run(&self, _invocation: &GitInvocation) -> std::result::Result<CommandOutput, CommandError> {
            Ok(CommandOutput::from_stdout(self.0))
        }
    }

    #[derive(Default)]
    struct Recorder {
        opened: Mutex<Vec<(PathBuf, u32, u32)>>,
        warnings: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
    }

    impl Editor for Recorder {
        fn open_at(&self, path: &Path, line: u32, column: u32) -> std::io::Result<()> {
            self.opened.lock().push((path.to_path_buf(), line, column));
            Ok(())
        }
    }

    impl Notifier for Recorder {
        fn warn(&self, message: &str) {
            self.warnings.lock().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().push(message.to_string());
        }
    }

    fn record(line: u32, file: &str, line_number: u32) -> ErrorRecord {
        ErrorRecord {
            line_index: line,
            start_column: 0,
            content: format!("ERROR at {file}:{line_number}"),
            source_reference: Some(SourceReference {
                file_path: file.to_string(),
                line_number,
            }),
        }
    }

    fn navigator(roots: Vec<RepositoryRoot>) -> ReferenceNavigator<FixedRunner> {
        ReferenceNavigator::new(shared_registry(), RepositoryResolver::new(roots), FixedRunner(""))
    }

    #[tokio::test]
    async fn unregistered_document_has_no_reference() {
        let nav = navigator(vec![]);
        assert_eq!(nav.navigate("app.log", 0).await.expect("navigate"), NavigationOutcome::NoReference);
    }

    #[tokio::test]
    async fn found_file_targets_zero_based_line() {
        let repo = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(repo.path().join("src")).expect("mkdir");
        std::fs::write(repo.path().join("src/core.rs"), "fn main() {}\n").expect("write");

        let nav = navigator(vec![RepositoryRoot::new("core", repo.path())]);
        nav.registry().register("app.log", vec![record(3, "build/src/core.rs", 17)], "1.0.0");

        let outcome = nav.navigate("app.log", 3).await.expect("navigate");
        let NavigationOutcome::Found { path, line, column, pin } = outcome else {
            panic!("expected Found, got {outcome:?}");
        };
        assert_eq!(path, repo.path().join("src/core.rs"));
        assert_eq!(line, 16);
        assert_eq!(column, 0);
        assert_eq!(pin, PinOutcome::SyncFailed);
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_logged_path() {
        let repo = tempfile::tempdir().expect("tempdir");
        let nav = navigator(vec![RepositoryRoot::new("core", repo.path())]);
        nav.registry().register("app.log", vec![record(0, "lib/gone.c", 5)], "1.0.0");
        let host = Recorder::default();

        let outcome = nav.open("app.log", 0, &host, &host).await.expect("navigate");

        assert_eq!(
            outcome,
            NavigationOutcome::SourceFileMissing {
                file_path: "lib/gone.c".to_string()
            }
        );
        assert_eq!(*host.errors.lock(), ["Source file: lib/gone.c not found."]);
        assert!(host.opened.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_pin_warns_and_still_opens() {
        let repo = tempfile::tempdir().expect("tempdir");
        std::fs::write(repo.path().join("core.rs"), "").expect("write");
        let nav = navigator(vec![RepositoryRoot::new("core", repo.path())]);
        nav.registry().register("app.log", vec![record(2, "core.rs", 1)], "1.0.0");
        let host = Recorder::default();

        nav.open("app.log", 2, &host, &host).await.expect("navigate");

        assert_eq!(*host.warnings.lock(), [PIN_FALLBACK_MESSAGE]);
        assert_eq!(*host.opened.lock(), [(repo.path().join("core.rs"), 0, 0)]);
    }

    #[tokio::test]
    async fn line_without_record_opens_nothing() {
        let nav = navigator(vec![]);
        nav.registry().register("app.log", vec![record(2, "core.rs", 1)], "1.0.0");
        let host = Recorder::default();

        let outcome = nav.open("app.log", 1, &host, &host).await.expect("navigate");

        assert_eq!(outcome, NavigationOutcome::NoReference);
        assert!(host.opened.lock().is_empty());
        assert!(host.errors.lock().is_empty());
    }

    #[tokio::test]
    async fn unreadable_root_is_an_error() {
        let nav = navigator(vec![RepositoryRoot::new("gone", "/nonexistent/loglens-root")]);
        nav.registry().register("app.log", vec![record(0, "core.rs", 1)], "1.0.0");

        let result = nav.navigate("app.log", 0).await;
        assert!(matches!(result, Err(NavError::Repository(_))));
    }
}
