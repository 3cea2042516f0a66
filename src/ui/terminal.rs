//! ui::terminal
//!
//! [`ConsoleIo`] for a real terminal.

use super::io::ConsoleIo;
use super::output::{self, Verbosity};
use super::prompts::{self, PromptError};

/// Terminal console: dialoguer prompts, stdout/stderr messages.
#[derive(Debug, Clone)]
pub struct TerminalIo {
    verbosity: Verbosity,
    interactive: bool,
    last_error: Option<String>,
}

impl TerminalIo {
    /// Create a terminal console.
    ///
    /// With `interactive == false` every prompt resolves to its default.
    pub fn new(verbosity: Verbosity, interactive: bool) -> Self {
        Self {
            verbosity,
            interactive,
            last_error: None,
        }
    }

    /// The most recent error reported through this console.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl ConsoleIo for TerminalIo {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, PromptError> {
        prompts::input(question, default, self.interactive)
    }

    fn choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> Result<String, PromptError> {
        let default_idx = default.and_then(|d| choices.iter().position(|c| c == d));
        let idx = prompts::select(question, choices, default_idx, self.interactive)?;
        choices
            .get(idx)
            .cloned()
            .ok_or_else(|| PromptError::InvalidChoice(idx.to_string()))
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, PromptError> {
        prompts::confirm(question, default, self.interactive)
    }

    fn info(&mut self, message: &str) {
        output::print(message, self.verbosity);
    }

    fn warn(&mut self, message: &str) {
        output::warn(message, self.verbosity);
    }

    fn error(&mut self, message: &str) {
        output::error(message);
        self.last_error = Some(message.to_string());
    }
}
