//! Settings file and command-line overrides.
//!
//! ```toml
//! rules = "rules.json"
//! theme = "theme.json"
//! default_version = "0.0.0"
//!
//! [git]
//! timeout_secs = 30
//!
//! [[repository]]
//! key = "core"
//! path = "/src/core"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use loglens_nav::session::DEFAULT_VERSION;
use loglens_repo::{RepositoryResolver, RepositoryRoot, SystemRunner};
use loglens_rules::{RuleSet, RuleSetBuild, ThemeLegend};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::error::CliError;

/// Settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "loglens.toml";

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

/// Settings for running git.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitSettings {
    /// Seconds a single git command may run.
    pub timeout_secs: u64,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            timeout_secs: loglens_repo::command::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Everything a command needs to know about the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Rule configuration file.
    #[serde(default)]
    pub rules: Option<PathBuf>,
    /// Theme configuration file.
    #[serde(default)]
    pub theme: Option<PathBuf>,
    /// Version label for logs that do not name one.
    #[serde(default = "default_version")]
    pub default_version: String,
    /// Git settings.
    #[serde(default)]
    pub git: GitSettings,
    /// Repository roots, searched in order.
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryRoot>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: None,
            theme: None,
            default_version: default_version(),
            git: GitSettings::default(),
            repositories: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read settings file '{}': {e}", path.display()))
        })?;

        let mut settings = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            settings.resolve_relative_to(base);
        }
        Ok(settings)
    }

    /// Parse settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let settings: Self =
            toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Builds the settings for one invocation: the `--config` file, or
    /// `loglens.toml` when present, then command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file or a `--repo` flag is invalid.
    pub fn load(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => Self::from_file(DEFAULT_SETTINGS_FILE)?,
            None => Self::default(),
        };

        if let Some(rules) = &cli.rules {
            settings.rules = Some(rules.clone());
        }
        if let Some(theme) = &cli.theme {
            settings.theme = Some(theme.clone());
        }
        for flag in &cli.repos {
            settings.repositories.push(parse_repository(flag)?);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is unusable.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.default_version.trim().is_empty() {
            return Err(CliError::Config("default_version cannot be empty".to_string()));
        }

        if self.git.timeout_secs == 0 {
            return Err(CliError::Config(
                "git.timeout_secs must be greater than 0".to_string(),
            ));
        }

        for (i, repo) in self.repositories.iter().enumerate() {
            if repo.key.is_empty() {
                return Err(CliError::Config(format!("repository #{} has an empty key", i + 1)));
            }
            if repo.path.as_os_str().is_empty() {
                return Err(CliError::Config(format!("repository '{}' has an empty path", repo.key)));
            }
            if self.repositories[..i].iter().any(|r| r.key == repo.key) {
                return Err(CliError::Config(format!("repository key '{}' is used twice", repo.key)));
            }
        }

        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(rules) = self.rules.as_mut() {
            join(rules);
        }
        if let Some(theme) = self.theme.as_mut() {
            join(theme);
        }
        for repo in &mut self.repositories {
            join(&mut repo.path);
        }
    }

    /// Reads and builds the rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if no rule file is configured, it cannot be read, or
    /// it is not a JSON object.
    pub fn load_rules(&self) -> Result<RuleSetBuild, CliError> {
        let path = self.rules.as_ref().ok_or_else(|| {
            CliError::Config("no rule configuration; set `rules` in the settings or pass --rules".to_string())
        })?;
        let text = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read rule configuration '{}': {e}", path.display()))
        })?;

        let build = RuleSet::from_json(&text)?;
        debug!(
            rules = build.rule_set.len(),
            dropped = build.dropped.len(),
            path = %path.display(),
            "rules loaded"
        );
        Ok(build)
    }

    /// Reads the theme legend.
    ///
    /// A missing or unreadable theme yields an empty legend so that
    /// classification still runs without colors.
    pub fn load_legend(&self) -> ThemeLegend {
        let Some(path) = &self.theme else {
            return ThemeLegend::default();
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "theme configuration unreadable, colors disabled");
                return ThemeLegend::default();
            }
        };

        ThemeLegend::from_json(&text).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "theme configuration invalid, colors disabled");
            ThemeLegend::default()
        })
    }

    /// Resolver over the configured repositories.
    #[must_use]
    pub fn resolver(&self) -> RepositoryResolver {
        RepositoryResolver::new(self.repositories.clone())
    }

    /// Git runner with the configured timeout.
    #[must_use]
    pub fn runner(&self) -> SystemRunner {
        SystemRunner::new(Duration::from_secs(self.git.timeout_secs))
    }
}

/// Parses a `KEY=PATH` repository flag.
///
/// # Errors
///
/// Returns an error if the key or path is missing.
pub fn parse_repository(flag: &str) -> Result<RepositoryRoot, CliError> {
    match flag.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => Ok(RepositoryRoot::new(key, path)),
        _ => Err(CliError::InvalidArgument(format!(
            "repository must be KEY=PATH, got '{flag}'"
        ))),
    }
}
