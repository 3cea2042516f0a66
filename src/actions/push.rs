//! actions::push
//!
//! Classify the repository and push.
//!
//! # Algorithm
//!
//! The two state predicates are queried once per invocation and mapped to a
//! [`RepositoryState`]; the state alone decides which commands run:
//!
//! | uncommitted | unpushed | state | commands |
//! |---|---|---|---|
//! | no | no | `UpToDate` | none |
//! | no | yes | `UnpushedOnly` | `push` |
//! | yes | no | `UncommittedOnly` | `add`, `commit`, `push` |
//! | yes | yes | `MixedChanges` | `add`, `commit`, `push` |
//!
//! The first failing command stops the sequence. Nothing already applied is
//! rolled back.

use serde_json::json;
use tracing::{debug, info};

use super::{fail, non_blank, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::core::events::DomainEvent;
use crate::git::GitError;
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Add, commit and push changes to remote repository";

/// Working tree and commit state relative to the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    UpToDate,
    UnpushedOnly,
    UncommittedOnly,
    MixedChanges,
}

impl RepositoryState {
    pub fn classify(uncommitted: bool, unpushed: bool) -> Self {
        match (uncommitted, unpushed) {
            (false, false) => RepositoryState::UpToDate,
            (false, true) => RepositoryState::UnpushedOnly,
            (true, false) => RepositoryState::UncommittedOnly,
            (true, true) => RepositoryState::MixedChanges,
        }
    }

    /// Whether a commit has to be made before pushing.
    pub fn needs_commit(self) -> bool {
        matches!(
            self,
            RepositoryState::UncommittedOnly | RepositoryState::MixedChanges
        )
    }
}

pub struct PushAction {
    ctx: ActionContext,
}

impl PushAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let state = RepositoryState::classify(
            self.ctx.gateway.has_uncommitted_changes()?,
            self.ctx.gateway.has_unpushed_commits()?,
        );
        debug!(?state, "classified repository");

        match state {
            RepositoryState::UpToDate => {
                // Nothing is pushed, so a detached HEAD is fine here.
                let branch = match non_blank(options.branch.as_deref()) {
                    Some(branch) => Some(branch.to_string()),
                    None => self.ctx.gateway.current_branch()?,
                };
                io.info("No changes to commit or push.");
                Ok(ActionResult::success(
                    "Repository is up to date - nothing to push",
                    json!({ "branch": branch }),
                ))
            }
            RepositoryState::UnpushedOnly => {
                let branch = self.ctx.branch_or_current(options)?;
                io.info("Found unpushed commits. Pushing existing commits to remote...");
                let output = self.push(&branch)?;
                io.info(&format!("Pushed existing commits to branch: {}", branch));
                Ok(ActionResult::success(
                    format!("Successfully pushed existing commits to {}", branch),
                    json!({ "branch": branch, "output": output }),
                ))
            }
            RepositoryState::UncommittedOnly | RepositoryState::MixedChanges => {
                let branch = self.ctx.branch_or_current(options)?;
                let message = self.ctx.commit_messages.build(options, &branch, io)?;
                self.commit(&message)?;
                io.info("Changes committed successfully.");
                self.ctx
                    .events
                    .publish(&DomainEvent::commit_pushed(&branch, &message));

                let output = self.push(&branch)?;
                io.info(&format!("Pushed to branch: {}", branch));
                Ok(ActionResult::success(
                    format!("Successfully committed and pushed to {}", branch),
                    json!({ "branch": branch, "message": message, "output": output }),
                ))
            }
        }
    }

    fn commit(&self, message: &str) -> Result<(), ActionError> {
        self.ctx.gateway.run(&["add", "."])?;
        match self.ctx.gateway.run(&["commit", "-m", message]) {
            Ok(_) => Ok(()),
            Err(err) if nothing_to_commit(&err) => Err(ActionError::NoChangesToCommit),
            Err(err) => Err(err.into()),
        }
    }

    fn push(&self, branch: &str) -> Result<String, ActionError> {
        let remote = self.ctx.remote();
        info!(remote, branch, "pushing");
        let output = self.ctx.gateway.run(&["push", remote, branch])?;
        Ok(output.text())
    }
}

fn nothing_to_commit(err: &GitError) -> bool {
    err.failure_text()
        .to_ascii_lowercase()
        .contains("nothing to commit")
}

impl Action for PushAction {
    fn name(&self) -> &'static str {
        "push"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail("Push", &err, io),
        }
    }
}
