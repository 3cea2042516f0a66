//! ui::io
//!
//! The console I/O port.
//!
//! Actions ask questions and report progress only through [`ConsoleIo`];
//! they never touch stdin/stdout themselves.

use super::prompts::PromptError;

/// Capability for prompting the user and emitting messages.
pub trait ConsoleIo {
    /// Ask for free text. Empty input resolves to `default` when given.
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, PromptError>;

    /// Offer a fixed set of choices and return the chosen value.
    fn choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> Result<String, PromptError>;

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, PromptError>;

    /// Emit an informational message.
    fn info(&mut self, message: &str);

    /// Emit a warning.
    fn warn(&mut self, message: &str);

    /// Emit an error.
    fn error(&mut self, message: &str);
}
