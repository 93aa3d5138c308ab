//! Shared fixtures for navigation tests.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use loglens_nav::{Editor, Notifier};
use loglens_repo::{CommandError, CommandOutput, CommandRunner, GitInvocation};
use loglens_rules::RuleSet;
use parking_lot::Mutex;

pub const RULES: &str = r#"{
    "highlight": {
        "ERROR": { "regex": "ERROR:.*", "tilEnd": true, "theme": "error" },
        "LEVEL": { "regex": "\\[[A-Z]+\\]", "char": "[", "offset": 1, "theme": "level" }
    },
    "panel": ["ERROR"],
    "jump": ["ERROR"]
}"#;

pub fn rules() -> RuleSet {
    RuleSet::from_json(RULES).expect("valid rules").rule_set
}

/// Writes `relative` under `root`, creating parent directories.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(&path, "int main(void) { return 0; }\n").expect("write file");
    path
}

/// Replays canned git output and records every invocation.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<Result<CommandOutput, CommandError>>>,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl ScriptedRunner {
    pub fn with_stdout(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(
                responses
                    .iter()
                    .map(|s| Ok(CommandOutput::from_stdout(*s)))
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Output of a pull, tag query and checkout that all succeed.
    pub fn successful_pin(tag: &str) -> Self {
        Self::with_stdout(&[
            "Already up to date.\n",
            &format!("{tag}\n"),
            &format!("HEAD is now at 0badc0d release {tag}\n"),
        ])
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &GitInvocation) -> Result<CommandOutput, CommandError> {
        self.calls
            .lock()
            .push((invocation.description(), invocation.current_dir().to_path_buf()));
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(CommandOutput::default()))
    }
}

/// Editor and notifier that remember what they were asked to do.
#[derive(Default)]
pub struct RecordingHost {
    pub opened: Mutex<Vec<(PathBuf, u32, u32)>>,
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Editor for RecordingHost {
    fn open_at(&self, path: &Path, line: u32, column: u32) -> std::io::Result<()> {
        self.opened.lock().push((path.to_path_buf(), line, column));
        Ok(())
    }
}

impl Notifier for RecordingHost {
    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}
