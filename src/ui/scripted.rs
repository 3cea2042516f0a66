//! ui::scripted
//!
//! Scripted console for deterministic testing.
//!
//! Answers are consumed in order; each prompt and each emitted message is
//! recorded so tests can assert on the transcript.
//!
//! # Example
//!
//! ```
//! use gitkit::ui::{ConsoleIo, ScriptedIo};
//!
//! let mut io = ScriptedIo::new().answer("feature/login");
//! assert_eq!(io.ask("Branch name:", None).unwrap(), "feature/login");
//! io.info("Switched");
//! assert!(io.saw_info("Switched"));
//! ```

use std::collections::VecDeque;

use super::io::ConsoleIo;
use super::prompts::PromptError;

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Console that replays queued answers and records output.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    messages: Vec<(Level, String)>,
}

impl ScriptedIo {
    /// Create a console with no queued answers.
    ///
    /// Prompts without a queued answer resolve to their default, or fail
    /// with [`PromptError::NotInteractive`] when there is none.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next prompt.
    pub fn answer(mut self, value: &str) -> Self {
        self.answers.push_back(value.to_string());
        self
    }

    /// Questions asked so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Messages emitted so far, in order.
    pub fn messages(&self) -> &[(Level, String)] {
        &self.messages
    }

    /// Messages of one level.
    pub fn messages_at(&self, level: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Whether an info message containing `needle` was emitted.
    pub fn saw_info(&self, needle: &str) -> bool {
        self.saw(Level::Info, needle)
    }

    /// Whether a warning containing `needle` was emitted.
    pub fn saw_warning(&self, needle: &str) -> bool {
        self.saw(Level::Warn, needle)
    }

    /// Whether an error containing `needle` was emitted.
    pub fn saw_error(&self, needle: &str) -> bool {
        self.saw(Level::Error, needle)
    }

    fn saw(&self, level: Level, needle: &str) -> bool {
        self.messages
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn next_answer(&mut self, question: &str) -> Option<String> {
        self.prompts.push(question.to_string());
        self.answers.pop_front()
    }
}

impl ConsoleIo for ScriptedIo {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String, PromptError> {
        match self.next_answer(question) {
            Some(answer) if answer.is_empty() => Ok(default.unwrap_or_default().to_string()),
            Some(answer) => Ok(answer),
            None => default
                .map(String::from)
                .ok_or_else(|| PromptError::NotInteractive(question.to_string())),
        }
    }

    fn choice(
        &mut self,
        question: &str,
        choices: &[String],
        default: Option<&str>,
    ) -> Result<String, PromptError> {
        let picked = match self.next_answer(question) {
            Some(answer) => answer,
            None => default
                .map(String::from)
                .ok_or_else(|| PromptError::NotInteractive(question.to_string()))?,
        };

        if choices.iter().any(|c| *c == picked) {
            Ok(picked)
        } else {
            Err(PromptError::InvalidChoice(picked))
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool, PromptError> {
        Ok(match self.next_answer(question).as_deref() {
            Some("y") | Some("yes") | Some("true") => true,
            Some("n") | Some("no") | Some("false") => false,
            _ => default,
        })
    }

    fn info(&mut self, message: &str) {
        self.messages.push((Level::Info, message.to_string()));
    }

    fn warn(&mut self, message: &str) {
        self.messages.push((Level::Warn, message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.messages.push((Level::Error, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_consumed_in_order() {
        let mut io = ScriptedIo::new().answer("one").answer("two");
        assert_eq!(io.ask("first", None).unwrap(), "one");
        assert_eq!(io.ask("second", None).unwrap(), "two");
        assert_eq!(io.ask("third", Some("dflt")).unwrap(), "dflt");
        assert_eq!(io.prompts(), &["first", "second", "third"]);
    }

    #[test]
    fn blank_answer_uses_default() {
        let mut io = ScriptedIo::new().answer("");
        assert_eq!(io.ask("q", Some("main")).unwrap(), "main");
    }

    #[test]
    fn choice_must_be_offered() {
        let choices = vec!["feat".to_string(), "fix".to_string()];
        let mut io = ScriptedIo::new().answer("docs");
        assert_eq!(
            io.choice("type", &choices, None).unwrap_err(),
            PromptError::InvalidChoice("docs".to_string())
        );
        assert_eq!(io.choice("type", &choices, Some("feat")).unwrap(), "feat");
    }

    #[test]
    fn records_messages_by_level() {
        let mut io = ScriptedIo::new();
        io.info("a");
        io.warn("b");
        io.error("c");
        assert_eq!(io.messages_at(Level::Warn), vec!["b"]);
        assert!(io.saw_error("c"));
        assert!(!io.saw_info("c"));
    }
}
