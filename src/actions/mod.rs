//! actions
//!
//! The user-invokable verbs and the registry that resolves them.
//!
//! # Contract
//!
//! Every action implements [`Action`]: it takes the parsed options and the
//! console port and returns an [`ActionResult`]. Errors never escape an
//! action; they are reported on the console and folded into a failure
//! result.
//!
//! # Modules
//!
//! - [`registry`] - Name to factory lookup
//! - [`result`] - The outcome value
//! - [`push`] - Repository-state classifier and push
//! - [`merge`] - Multi-target merge with partial-failure aggregation
//! - [`rebase`] - Rebase with continue/abort/skip and conflict detection
//! - [`pull`], [`checkout`], [`branch`], [`fetch`] - Single-command verbs

pub mod branch;
pub mod checkout;
pub mod fetch;
pub mod merge;
pub mod pull;
pub mod push;
pub mod rebase;
pub mod registry;
pub mod result;

pub use registry::ActionRegistry;
pub use result::ActionResult;

use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::commit::{CommitMessageBuilder, CommitMessageSource};
use crate::core::config::Config;
use crate::core::events::EventBus;
use crate::core::naming::NamingError;
use crate::git::{GitError, RepositoryGateway};
use crate::ui::{ConsoleIo, PromptError};

/// Errors raised inside actions.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No action registered under this name.
    #[error("unsupported action '{action}'; supported actions: {}", .supported.join(", "))]
    UnsupportedAction {
        action: String,
        supported: Vec<String>,
    },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("no changes to commit")]
    NoChangesToCommit,

    #[error("not on a branch (detached HEAD); pass --branch")]
    NoCurrentBranch,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl From<NamingError> for ActionError {
    fn from(err: NamingError) -> Self {
        match err {
            NamingError::InvalidBranchName(name) => ActionError::InvalidBranchName(name),
        }
    }
}

/// Options already parsed by the caller.
///
/// Each action reads only the fields it understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOptions {
    pub branch: Option<String>,
    pub message: Option<String>,
    pub commit_type: Option<String>,
    pub source: Option<String>,
    /// Legacy alias for `source`
    pub merge: Option<String>,
    pub target: Option<String>,
    pub interactive: bool,
    pub onto: Option<String>,
    pub abort: bool,
    pub continue_rebase: bool,
    pub skip: bool,
}

/// A user-invokable verb.
pub trait Action {
    fn name(&self) -> &'static str;

    /// One-line description for the action listing.
    fn description(&self) -> &'static str;

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult;
}

/// Collaborators handed to every action factory.
#[derive(Clone)]
pub struct ActionContext {
    pub gateway: Rc<dyn RepositoryGateway>,
    pub config: Rc<Config>,
    pub events: Rc<EventBus>,
    pub commit_messages: Rc<dyn CommitMessageSource>,
}

impl ActionContext {
    /// Context with the default event bus and commit message builder.
    pub fn new(gateway: Rc<dyn RepositoryGateway>, config: Rc<Config>) -> Self {
        let commit_messages = Rc::new(CommitMessageBuilder::new(Rc::clone(&config)));
        Self {
            gateway,
            config,
            events: Rc::new(EventBus::with_logging()),
            commit_messages,
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Rc::new(events);
        self
    }

    pub fn with_commit_messages(mut self, source: Rc<dyn CommitMessageSource>) -> Self {
        self.commit_messages = source;
        self
    }

    /// The configured remote.
    pub fn remote(&self) -> &str {
        self.config.remote()
    }

    /// `--branch` when given, otherwise the checked-out branch.
    pub fn branch_or_current(&self, options: &ActionOptions) -> Result<String, ActionError> {
        match non_blank(options.branch.as_deref()) {
            Some(branch) => Ok(branch.to_string()),
            None => self
                .gateway
                .current_branch()?
                .ok_or(ActionError::NoCurrentBranch),
        }
    }
}

/// `Some` only for a value with non-whitespace content.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Fold an action error into a failure result and report it.
pub(crate) fn fail(verb: &str, error: &ActionError, io: &mut dyn ConsoleIo) -> ActionResult {
    let message = format!("{} failed: {}", verb, error);
    debug!(verb, %error, "action failed");
    io.error(&message);
    ActionResult::failure(message, Value::Null)
}
