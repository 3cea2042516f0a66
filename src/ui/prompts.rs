//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode a
//! prompt resolves to its default, and a prompt without a default fails with
//! [`PromptError::NotInteractive`].

use dialoguer::{Confirm, Input, Select};
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("input required but prompts are disabled: {0}")]
    NotInteractive(String),

    #[error("'{0}' is not one of the offered choices")]
    InvalidChoice(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        PromptError::IoError(err.to_string())
    }
}

/// Prompt for confirmation (yes/no).
///
/// Returns `default` without prompting when not interactive.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Ok(default);
    }

    Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact_opt()?
        .ok_or(PromptError::Cancelled)
}

/// Prompt for text input.
///
/// Empty input is accepted and replaced by `default` when one is given.
pub fn input(message: &str, default: Option<&str>, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return default
            .map(String::from)
            .ok_or_else(|| PromptError::NotInteractive(message.to_string()));
    }

    let mut prompt = Input::<String>::new()
        .with_prompt(message)
        .allow_empty(true);
    if let Some(d) = default {
        prompt = prompt.default(d.to_string()).show_default(!d.is_empty());
    }

    Ok(prompt.interact_text()?)
}

/// Prompt to select from a list of options.
///
/// Returns the index of the selected option.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return default.ok_or_else(|| PromptError::NotInteractive(message.to_string()));
    }

    let items: Vec<&str> = options.iter().map(|o| o.as_ref()).collect();
    Select::new()
        .with_prompt(message)
        .items(&items[..])
        .default(default.unwrap_or(0))
        .interact_opt()?
        .ok_or(PromptError::Cancelled)
}
