//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Configuration is loaded once at process start into an immutable
//! [`Config`] value that is handed to every action. Nothing reads settings
//! from ambient state after that.
//!
//! # Precedence
//!
//! Layers are merged in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config file
//! 3. Shared repo config: `<work tree>/.gitkit.toml`
//! 4. Local repo config: `<git dir>/gitkit/config.toml`
//! 5. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$GITKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitkit/config.toml`
//! 3. `~/.gitkit/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use gitkit::core::config::Config;
//! use std::path::Path;
//!
//! let repo = Path::new("/path/to/repo");
//! let result = Config::load(Some(repo), Some(&repo.join(".git"))).unwrap();
//! let config = result.config;
//!
//! println!("Remote: {}", config.remote());
//! println!("Commit types: {:?}", config.commit_types());
//! ```

pub mod schema;

pub use schema::Settings;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Emoji used for commit types without a configured one.
pub const FALLBACK_EMOJI: &str = "🔧";

const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_COMMIT_TYPE: &str = "feat";
const DEFAULT_COMMIT_MESSAGE: &str = "Update [%s] branch with latest changes.";

const DEFAULT_COMMIT_TYPES: &[(&str, &str, &str)] = &[
    ("feat", "A new feature", "🚀"),
    ("fix", "A bug fix", "🐛"),
    ("docs", "Documentation only changes", "📝"),
    ("style", "Changes that do not affect the meaning of the code", "💄"),
    ("refactor", "A code change that neither fixes a bug nor adds a feature", "♻️"),
    ("perf", "A code change that improves performance", "⚡️"),
    ("test", "Adding missing tests or correcting existing tests", "🚨"),
    ("build", "Changes that affect the build system or external dependencies", "👷"),
    ("ci", "Changes to the CI configuration files and scripts", "🔧"),
    ("chore", "Changes to the build process or auxiliary tools", "🔧"),
    ("revert", "Revert to a commit", "⏪"),
];

const DEFAULT_BRANCH_TYPES: &[&str] = &["feature", "fix", "release", "support"];

/// Merged configuration from all layers.
///
/// Accessor methods apply built-in defaults for anything no layer set.
#[derive(Debug, Clone, Default)]
pub struct Config {
    settings: Settings,
    /// Files that contributed, lowest precedence first
    sources: Vec<PathBuf>,
}

impl Config {
    /// Build a config directly from settings (no files involved).
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let config = Self {
            settings,
            sources: Vec::new(),
        };
        config.validate_merged()?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// The shared layer is read from `work_dir` and the local layer from
    /// `git_dir`. In a linked worktree `git_dir` is the per-worktree
    /// directory under `.git/worktrees/`, not `<work_dir>/.git`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or holds
    /// invalid values. Missing files are not an error.
    pub fn load(
        work_dir: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let global = Self::global_config_path();
        Self::load_from(global.as_deref(), work_dir, git_dir)
    }

    /// Load configuration from an explicit global path and repository dirs.
    pub fn load_from(
        global: Option<&Path>,
        work_dir: Option<&Path>,
        git_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = global {
            candidates.push(path.to_path_buf());
        }
        if let Some(dir) = work_dir {
            candidates.push(dir.join(".gitkit.toml"));
        }
        if let Some(dir) = git_dir {
            candidates.push(dir.join("gitkit/config.toml"));
        }

        let mut settings = Settings::default();
        let mut sources = Vec::new();
        for path in candidates {
            if !path.is_file() {
                continue;
            }
            let layer = Self::read_settings(&path)?;
            layer.validate()?;
            settings = settings.merge(layer);
            sources.push(path);
        }

        let config = Config { settings, sources };
        config.validate_merged()?;
        let warnings = config.collect_warnings();

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Locate the global config file, if any exists.
    fn global_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GITKIT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("gitkit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".gitkit/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse one config layer.
    fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Checks that only make sense once all layers are merged.
    fn validate_merged(&self) -> Result<(), ConfigError> {
        let kind = self.default_commit_type();
        if !self.commit_types().iter().any(|t| t == kind) {
            return Err(ConfigError::InvalidValue(format!(
                "default_commit_type '{}' is not one of: {}",
                kind,
                self.commit_types().join(", ")
            )));
        }
        Ok(())
    }

    fn collect_warnings(&self) -> Vec<ConfigWarning> {
        let Some(emojis) = &self.settings.commit_emojis else {
            return Vec::new();
        };

        self.commit_types()
            .into_iter()
            .filter(|t| !emojis.contains_key(t))
            .map(|t| ConfigWarning {
                message: format!(
                    "commit type '{}' has no emoji configured; using {}",
                    t, FALLBACK_EMOJI
                ),
            })
            .collect()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the remote name.
    ///
    /// Defaults to "origin" if not configured.
    pub fn remote(&self) -> &str {
        self.settings.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Commit type used when none is chosen.
    pub fn default_commit_type(&self) -> &str {
        self.settings
            .default_commit_type
            .as_deref()
            .unwrap_or(DEFAULT_COMMIT_TYPE)
    }

    /// Default commit text with `%s` replaced by `branch`.
    pub fn default_commit_message(&self, branch: Option<&str>) -> String {
        let template = self
            .settings
            .default_commit_message
            .as_deref()
            .unwrap_or(DEFAULT_COMMIT_MESSAGE);
        template.replace("%s", branch.unwrap_or("current"))
    }

    /// Whether push should skip the commit-message prompt.
    ///
    /// Defaults to `false` if not configured.
    pub fn push_with_default_message(&self) -> bool {
        self.settings.push_with_default_message.unwrap_or(false)
    }

    /// Commit types offered by the commit-message prompt.
    pub fn commit_types(&self) -> Vec<String> {
        match &self.settings.commit_types {
            Some(types) => types.keys().cloned().collect(),
            None => DEFAULT_COMMIT_TYPES
                .iter()
                .map(|(t, _, _)| t.to_string())
                .collect(),
        }
    }

    /// Emoji for a commit type, falling back to [`FALLBACK_EMOJI`].
    pub fn commit_emoji(&self, kind: &str) -> &str {
        if let Some(emojis) = &self.settings.commit_emojis {
            return emojis.get(kind).map(String::as_str).unwrap_or(FALLBACK_EMOJI);
        }
        DEFAULT_COMMIT_TYPES
            .iter()
            .find(|(t, _, _)| *t == kind)
            .map(|(_, _, emoji)| *emoji)
            .unwrap_or(FALLBACK_EMOJI)
    }

    /// Branch types offered by the branch action.
    pub fn branch_types(&self) -> Vec<String> {
        match &self.settings.branch_types {
            Some(types) => types.keys().cloned().collect(),
            None => DEFAULT_BRANCH_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Config files that contributed, lowest precedence first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}
