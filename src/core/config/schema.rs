//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same [`Settings`] shape is used for every layer (global, shared repo,
//! local repo); layers are merged field by field.
//!
//! # Validation
//!
//! Config values are validated after merging so that, for example, a repo
//! layer may pick a `default_commit_type` that only the global layer defines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// One configuration layer.
///
/// # Example
///
/// ```toml
/// remote = "origin"
/// default_commit_type = "feat"
/// default_commit_message = "Update [%s] branch with latest changes."
/// push_with_default_message = false
///
/// [commit_types]
/// feat = "A new feature"
/// fix = "A bug fix"
///
/// [commit_emojis]
/// feat = "🚀"
/// fix = "🐛"
///
/// [branch_types]
/// feature = "Features"
/// fix = "Bug Fixes"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Remote that push/pull/merge talk to (default: "origin")
    pub remote: Option<String>,

    /// Commit type used when none is chosen (default: "feat")
    pub default_commit_type: Option<String>,

    /// Default commit text; `%s` is replaced with the branch name
    pub default_commit_message: Option<String>,

    /// Skip the commit-message prompt and always use the default text
    pub push_with_default_message: Option<bool>,

    /// Commit types offered by the commit-message prompt
    pub commit_types: Option<BTreeMap<String, String>>,

    /// Emoji prepended to commit messages, keyed by commit type
    pub commit_emojis: Option<BTreeMap<String, String>>,

    /// Branch types offered by the branch action
    pub branch_types: Option<BTreeMap<String, String>>,
}

impl Settings {
    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: Settings) -> Settings {
        Settings {
            remote: other.remote.or(self.remote),
            default_commit_type: other.default_commit_type.or(self.default_commit_type),
            default_commit_message: other.default_commit_message.or(self.default_commit_message),
            push_with_default_message: other
                .push_with_default_message
                .or(self.push_with_default_message),
            commit_types: other.commit_types.or(self.commit_types),
            commit_emojis: other.commit_emojis.or(self.commit_emojis),
            branch_types: other.branch_types.or(self.branch_types),
        }
    }

    /// Validate a single layer's values in isolation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            if remote.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "remote cannot be empty".to_string(),
                ));
            }
        }

        if let Some(message) = &self.default_commit_message {
            if message.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "default_commit_message cannot be empty".to_string(),
                ));
            }
        }

        for (field, map) in [
            ("commit_types", &self.commit_types),
            ("branch_types", &self.branch_types),
        ] {
            if let Some(map) = map {
                if map.is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} cannot be empty",
                        field
                    )));
                }
            }
        }

        Ok(())
    }
}
