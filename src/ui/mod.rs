//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`io`] - The [`ConsoleIo`] port actions talk to
//! - [`prompts`] - Interactive prompts and confirmations
//! - [`output`] - Output formatting and display
//! - [`terminal`] - [`ConsoleIo`] for a real terminal
//! - [`scripted`] - [`ConsoleIo`] that replays canned answers, for tests
//!
//! # Design
//!
//! All output and prompts go through this module to ensure consistent
//! formatting and proper handling of interactive vs non-interactive modes.

pub mod io;
pub mod output;
pub mod prompts;
pub mod scripted;
pub mod terminal;

pub use io::ConsoleIo;
pub use output::Verbosity;
pub use prompts::PromptError;
pub use scripted::{Level, ScriptedIo};
pub use terminal::TerminalIo;
