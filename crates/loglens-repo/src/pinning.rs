//! Pinning a repository working tree to a version tag.
//!
//! Three git steps run in order, each inspected as plain text:
//!
//! 1. `git pull` must report the tree is already up to date. Anything else
//!    (merge, conflict, no remote) aborts before touching the checkout.
//! 2. `git tag -l <version>` must list a tag equal to `version`.
//! 3. `git checkout <tag>` must confirm the new `HEAD`.
//!
//! Pinning is best-effort: a failed command counts as empty output, and the
//! caller keeps working with whatever is currently checked out.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::command::{CommandRunner, GitCommand, GitInvocation};

/// Text `git pull` prints when nothing needed fetching or merging.
const UP_TO_DATE_MARKERS: &[&str] = &["up to date", "up-to-date"];

/// Text `git checkout` prints after moving `HEAD`.
const CHECKOUT_CONFIRMATION: &str = "HEAD is now at";

/// Result of a pinning attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinOutcome {
    /// The working tree is checked out at the tag.
    Pinned {
        /// The tag that was checked out.
        tag: String,
    },
    /// The version label cannot be used as a git operand.
    InvalidVersion,
    /// `git pull` did not report an up-to-date tree.
    SyncFailed,
    /// No tag matches the version exactly.
    TagNotFound,
    /// `git checkout` did not confirm the new `HEAD`.
    CheckoutFailed,
}

impl PinOutcome {
    /// Returns true if the tree is now at the requested version.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned { .. })
    }
}

impl fmt::Display for PinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pinned { tag } => write!(f, "checked out {tag}"),
            Self::InvalidVersion => write!(f, "version label is not a valid tag name"),
            Self::SyncFailed => write!(f, "repository could not be synchronized with its remote"),
            Self::TagNotFound => write!(f, "no tag matches the version"),
            Self::CheckoutFailed => write!(f, "checkout of the version tag failed"),
        }
    }
}

/// Pins repositories to version tags through a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct VersionPinner<R> {
    runner: R,
}

impl<R: CommandRunner> VersionPinner<R> {
    /// Creates a pinner that executes git through `runner`.
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    /// The underlying runner.
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Pins `repository` to `version`, returning whether it succeeded.
    pub async fn pin_to_version(&self, repository: &Path, version: &str) -> bool {
        self.pin(repository, version).await.is_pinned()
    }

    /// Pins `repository` to `version`, reporting which step failed.
    ///
    /// A successful checkout leaves `HEAD` detached at the tag. `git pull`
    /// fails on a detached `HEAD`, so every later call on the same working
    /// tree returns [`PinOutcome::SyncFailed`], including a repeat of the
    /// same version, until the branch is checked out again.
    pub async fn pin(&self, repository: &Path, version: &str) -> PinOutcome {
        let Ok(tag_query) = GitCommand::new()
            .args(["tag", "-l"])
            .operand(version)
            .current_dir(repository)
            .build()
        else {
            warn!(version, "refusing to pin to an unusable version label");
            return PinOutcome::InvalidVersion;
        };

        let pull = self.run_text(GitCommand::new().arg("pull").current_dir(repository)).await;
        if !UP_TO_DATE_MARKERS.iter().any(|m| pull.contains(m)) {
            warn!(repo = %repository.display(), "git pull did not report an up-to-date tree");
            return PinOutcome::SyncFailed;
        }

        let tags = self.run_invocation(&tag_query).await;
        let Some(tag) = tags.lines().map(str::trim).find(|t| *t == version) else {
            warn!(repo = %repository.display(), version, "no tag matches version");
            return PinOutcome::TagNotFound;
        };

        let checkout = self
            .run_text(GitCommand::new().arg("checkout").operand(tag).current_dir(repository))
            .await;
        if !checkout.contains(CHECKOUT_CONFIRMATION) {
            warn!(repo = %repository.display(), tag, "checkout did not confirm the new HEAD");
            return PinOutcome::CheckoutFailed;
        }

        info!(repo = %repository.display(), tag, "repository pinned to version");
        PinOutcome::Pinned {
            tag: tag.to_string(),
        }
    }

    /// Runs a command, mapping every failure to empty output.
    async fn run_text(&self, command: GitCommand) -> String {
        match command.build() {
            Ok(invocation) => self.run_invocation(&invocation).await,
            Err(e) => {
                debug!(error = %e, "git command rejected");
                String::new()
            }
        }
    }

    async fn run_invocation(&self, invocation: &GitInvocation) -> String {
        match self.runner.run(invocation).await {
            Ok(output) => output.combined(),
            Err(e) => {
                debug!(command = %invocation.description(), error = %e, "git command failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use crate::error::CommandError;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays canned results and records every invocation.
    #[derive(Default)]
    struct ScriptedRunner {
        responses: Mutex<VecDeque<Result<CommandOutput, CommandError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn with(responses: Vec<Result<CommandOutput, CommandError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl CommandRunner for ScriptedRunner {
        async fn run(&self, invocation: &GitInvocation) -> Result<CommandOutput, CommandError> {
            self.calls.lock().push(invocation.description());
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(CommandOutput::default()))
        }
    }

    fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::from_stdout(stdout))
    }

    fn checkout_ok() -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            stdout: Vec::new(),
            stderr: b"Note: switching to 'v1.2.0'.\nHEAD is now at 1a2b3c4 Release 1.2.0\n".to_vec(),
            exit_code: 0,
        })
    }

    fn pinner(responses: Vec<Result<CommandOutput, CommandError>>) -> VersionPinner<ScriptedRunner> {
        VersionPinner::new(ScriptedRunner::with(responses))
    }

    #[tokio::test]
    async fn pins_when_every_step_confirms() {
        let pinner = pinner(vec![ok("Already up to date.\n"), ok("v1.2.0\n"), checkout_ok()]);

        let outcome = pinner.pin(Path::new("/repo"), "v1.2.0").await;

        assert_eq!(outcome, PinOutcome::Pinned { tag: "v1.2.0".to_string() });
        assert_eq!(
            pinner.runner().calls(),
            ["git pull", "git tag -l v1.2.0", "git checkout v1.2.0"]
        );
    }

    #[tokio::test]
    async fn accepts_legacy_up_to_date_spelling() {
        let pinner = pinner(vec![ok("Already up-to-date.\n"), ok("v1.2.0\n"), checkout_ok()]);
        assert!(pinner.pin_to_version(Path::new("/repo"), "v1.2.0").await);
    }

    #[tokio::test]
    async fn pull_that_merges_aborts_before_checkout() {
        let pinner = pinner(vec![ok("Updating 1a2b..3c4d\nFast-forward\n")]);

        let outcome = pinner.pin(Path::new("/repo"), "v1.2.0").await;

        assert_eq!(outcome, PinOutcome::SyncFailed);
        assert_eq!(pinner.runner().calls(), ["git pull"]);
    }

    #[tokio::test]
    async fn failed_pull_is_treated_as_empty_output() {
        let pinner = pinner(vec![Err(CommandError::NonZeroExit {
            command: "git pull".to_string(),
            exit_code: 1,
            stderr: "fatal: not a git repository".to_string(),
        })]);

        assert!(!pinner.pin_to_version(Path::new("/repo"), "v1.2.0").await);
    }

    #[tokio::test]
    async fn timed_out_pull_fails_softly() {
        let pinner = pinner(vec![Err(CommandError::TimedOut {
            command: "git pull".to_string(),
            after: Duration::from_secs(30),
        })]);

        assert_eq!(pinner.pin(Path::new("/repo"), "v1.2.0").await, PinOutcome::SyncFailed);
    }

    #[tokio::test]
    async fn missing_tag_leaves_checkout_untouched() {
        let pinner = pinner(vec![ok("Already up to date.\n"), ok("")]);

        let outcome = pinner.pin(Path::new("/repo"), "v9.9.9").await;

        assert_eq!(outcome, PinOutcome::TagNotFound);
        assert!(!pinner.runner().calls().iter().any(|c| c.starts_with("git checkout")));
    }

    #[tokio::test]
    async fn glob_matches_are_not_exact_tags() {
        let pinner = pinner(vec![ok("Already up to date.\n"), ok("v1.2.0-rc1\nv1.2.0-rc2\n")]);

        assert_eq!(pinner.pin(Path::new("/repo"), "v1.2.0*").await, PinOutcome::TagNotFound);
    }

    #[tokio::test]
    async fn checkout_without_confirmation_fails() {
        let pinner = pinner(vec![
            ok("Already up to date.\n"),
            ok("v1.2.0\n"),
            Err(CommandError::NonZeroExit {
                command: "git checkout v1.2.0".to_string(),
                exit_code: 1,
                stderr: "error: Your local changes would be overwritten".to_string(),
            }),
        ]);

        assert_eq!(pinner.pin(Path::new("/repo"), "v1.2.0").await, PinOutcome::CheckoutFailed);
    }

    #[tokio::test]
    async fn repeat_pin_on_detached_head_fails_to_sync() {
        let pinner = pinner(vec![
            ok("Already up to date.\n"),
            ok("v1.2.0\n"),
            checkout_ok(),
            Err(CommandError::NonZeroExit {
                command: "git pull".to_string(),
                exit_code: 1,
                stderr: "You are not currently on a branch.".to_string(),
            }),
        ]);

        assert!(pinner.pin_to_version(Path::new("/repo"), "v1.2.0").await);
        assert_eq!(pinner.pin(Path::new("/repo"), "v1.2.0").await, PinOutcome::SyncFailed);
        assert_eq!(pinner.runner().calls().len(), 4);
    }

    #[tokio::test]
    async fn option_like_version_runs_nothing() {
        let pinner = pinner(vec![]);

        assert_eq!(pinner.pin(Path::new("/repo"), "--orphan").await, PinOutcome::InvalidVersion);
        assert_eq!(pinner.pin(Path::new("/repo"), "").await, PinOutcome::InvalidVersion);
        assert!(pinner.runner().calls().is_empty());
    }

    #[test]
    fn outcome_display() {
        assert_eq!(
            PinOutcome::Pinned { tag: "v1".to_string() }.to_string(),
            "checked out v1"
        );
        assert!(!PinOutcome::TagNotFound.is_pinned());
    }
}
