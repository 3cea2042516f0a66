//! core::commit
//!
//! Commit message construction for the push action.

use std::rc::Rc;

use crate::actions::ActionOptions;
use crate::core::config::Config;
use crate::ui::{ConsoleIo, PromptError};

/// Produces the message for a commit made on `branch`.
///
/// Implementations must return a non-empty message.
pub trait CommitMessageSource {
    fn build(
        &self,
        options: &ActionOptions,
        branch: &str,
        io: &mut dyn ConsoleIo,
    ) -> Result<String, PromptError>;
}

/// Config-driven builder producing `<emoji> <type>: <text>` messages.
///
/// Resolution order:
/// 1. An explicit `--message` is used verbatim.
/// 2. With `push_with_default_message`, the default text is used without
///    prompting.
/// 3. Otherwise the text and type are asked for, defaulting to the
///    configured template and `--type` (or the configured default type).
#[derive(Debug, Clone)]
pub struct CommitMessageBuilder {
    config: Rc<Config>,
}

impl CommitMessageBuilder {
    pub fn new(config: Rc<Config>) -> Self {
        Self { config }
    }

    /// Format `text` with the emoji of `kind`.
    pub fn format(&self, kind: &str, text: &str) -> String {
        format!("{} {}: {}", self.config.commit_emoji(kind), kind, text)
    }

    fn default_kind<'a>(&'a self, options: &'a ActionOptions) -> &'a str {
        options
            .commit_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.config.default_commit_type())
    }
}

impl CommitMessageSource for CommitMessageBuilder {
    fn build(
        &self,
        options: &ActionOptions,
        branch: &str,
        io: &mut dyn ConsoleIo,
    ) -> Result<String, PromptError> {
        if let Some(message) = options.message.as_deref() {
            if !message.trim().is_empty() {
                return Ok(message.to_string());
            }
        }

        let default_text = self.config.default_commit_message(Some(branch));
        if self.config.push_with_default_message() {
            return Ok(self.format(self.default_kind(options), &default_text));
        }

        let question = format!(
            "Enter the commit message, Leave empty to use the default message [{}]",
            default_text
        );
        let text = io.ask(&question, Some(&default_text))?;
        let text = if text.trim().is_empty() {
            default_text
        } else {
            text
        };

        let kind = match options.commit_type.as_deref() {
            Some(kind) if !kind.trim().is_empty() => kind.to_string(),
            _ => io.choice(
                "Enter the commit type",
                &self.config.commit_types(),
                Some(self.default_kind(options)),
            )?,
        };

        Ok(self.format(&kind, &text))
    }
}
