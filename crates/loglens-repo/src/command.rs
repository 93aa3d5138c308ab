//! Validated git invocations and the runner seam that executes them.
//!
//! Commands are never passed through a shell. Arguments are checked for
//! control characters, and operands supplied by logs or users (tags, version
//! labels) may not start with `-` so git cannot read them as options.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::CommandError;

/// Default time allowed for a single git command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters that are never allowed in command arguments.
const FORBIDDEN_CHARS: &[char] = &['\0', '\n', '\r'];

fn validate_argument(arg: &str, field: &'static str) -> Result<(), CommandError> {
    if let Some(c) = arg.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(CommandError::invalid_argument(
            field,
            format!("contains forbidden character {c:?}"),
        ));
    }
    Ok(())
}

fn validate_operand(value: &str, field: &'static str) -> Result<(), CommandError> {
    if value.trim().is_empty() {
        return Err(CommandError::invalid_argument(field, "must not be empty"));
    }
    if value.starts_with('-') {
        return Err(CommandError::invalid_argument(field, "must not start with '-'"));
    }
    validate_argument(value, field)
}

/// Output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output.
    pub stdout: Vec<u8>,
    /// Standard error.
    pub stderr: Vec<u8>,
    /// Exit status code (0 for success).
    pub exit_code: i32,
}

impl CommandOutput {
    /// Creates a successful output with the given stdout text.
    #[must_use]
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into().into_bytes(),
            ..Self::default()
        }
    }

    /// Get stdout as a UTF-8 string, replacing invalid characters.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a UTF-8 string, replacing invalid characters.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Stdout followed by stderr.
    ///
    /// git reports some confirmations (e.g. after checkout) on stderr.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut text = self.stdout_lossy();
        if !self.stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&self.stderr_lossy());
        }
        text
    }

    /// Check if the command succeeded (exit code 0).
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A validated git command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInvocation {
    args: Vec<String>,
    current_dir: PathBuf,
}

impl GitInvocation {
    /// Arguments after `git`.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Working directory the command runs in.
    #[must_use]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Human-readable command line for logging.
    #[must_use]
    pub fn description(&self) -> String {
        if self.args.is_empty() {
            "git".to_string()
        } else {
            format!("git {}", self.args.join(" "))
        }
    }
}

/// Builder for [`GitInvocation`]s that collects validation failures.
///
/// ```rust
/// use loglens_repo::GitCommand;
///
/// let invocation = GitCommand::new()
///     .args(["tag", "-l"])
///     .operand("v1.2.0")
///     .current_dir("/src/core")
///     .build()?;
///
/// assert_eq!(invocation.description(), "git tag -l v1.2.0");
/// # Ok::<(), loglens_repo::CommandError>(())
/// ```
#[derive(Debug, Default)]
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    validation_errors: Vec<CommandError>,
}

impl GitCommand {
    /// Create an empty git command.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fixed argument such as a subcommand or flag.
    #[must_use]
    pub fn arg(mut self, arg: &str) -> Self {
        match validate_argument(arg, "argument") {
            Ok(()) => self.args.push(arg.to_string()),
            Err(e) => self.validation_errors.push(e),
        }
        self
    }

    /// Add multiple fixed arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self = self.arg(arg.as_ref());
        }
        self
    }

    /// Add an externally supplied operand; it must be non-empty and must
    /// not look like an option.
    #[must_use]
    pub fn operand(mut self, value: &str) -> Self {
        match validate_operand(value, "operand") {
            Ok(()) => self.args.push(value.to_string()),
            Err(e) => self.validation_errors.push(e),
        }
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            self.validation_errors
                .push(CommandError::invalid_argument("current_dir", "must not be empty"));
            return self;
        }
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Check if there are any validation errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// Finish building.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or an error if no working
    /// directory was set.
    pub fn build(self) -> Result<GitInvocation, CommandError> {
        if let Some(error) = self.validation_errors.into_iter().next() {
            return Err(error);
        }
        let current_dir = self
            .current_dir
            .ok_or_else(|| CommandError::invalid_argument("current_dir", "not set"))?;

        Ok(GitInvocation {
            args: self.args,
            current_dir,
        })
    }
}

/// Executes git invocations.
///
/// Implementations return `Err` for anything other than a zero exit status.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion.
    fn run(
        &self,
        invocation: &GitInvocation,
    ) -> impl Future<Output = Result<CommandOutput, CommandError>> + Send;
}

/// Runs git as a child process with a timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: PathBuf,
    timeout: Duration,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SystemRunner {
    /// Create a runner that invokes `git` from `PATH`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout,
        }
    }

    /// Use a specific git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &GitInvocation) -> Result<CommandOutput, CommandError> {
        let description = invocation.description();
        debug!(command = %description, cwd = %invocation.current_dir().display(), "running git");

        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(invocation.args())
            .current_dir(invocation.current_dir())
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(CommandError::ExecutionFailed {
                    message: format!("{description}: {e}"),
                });
            }
            Err(_) => {
                return Err(CommandError::TimedOut {
                    command: description,
                    after: self.timeout,
                });
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        if !output.status.success() {
            return Err(CommandError::NonZeroExit {
                command: description,
                exit_code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(CommandOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code,
        })
    }
}
