//! actions::rebase
//!
//! Start, continue, abort or skip a rebase.
//!
//! Each invocation is one transition. The rebase session itself lives in
//! git's state directory between invocations; nothing is stored here.
//!
//! A failed rebase command whose output mentions a conflict becomes a
//! failure carrying `conflicts: true`, so callers can branch on it without
//! matching text again.

use serde_json::{json, Value};
use tracing::debug;

use super::{fail, non_blank, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::git::GitError;
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Rebase commits onto another branch";

/// Which rebase transition an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseMode {
    Normal,
    Aborting,
    Continuing,
    Skipping,
}

impl RebaseMode {
    /// Pick the mode from the flags; `abort` beats `continue` beats `skip`.
    pub fn from_options(options: &ActionOptions) -> Self {
        if options.abort {
            RebaseMode::Aborting
        } else if options.continue_rebase {
            RebaseMode::Continuing
        } else if options.skip {
            RebaseMode::Skipping
        } else {
            RebaseMode::Normal
        }
    }
}

/// Build the argv for a plain rebase.
pub fn rebase_command<'a>(branch: &'a str, interactive: bool, onto: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec!["rebase"];
    if interactive {
        args.push("--interactive");
    }
    if let Some(onto) = onto {
        args.push("--onto");
        args.push(onto);
    }
    args.push(branch);
    args
}

pub struct RebaseAction {
    ctx: ActionContext,
}

impl RebaseAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let mode = RebaseMode::from_options(options);
        debug!(?mode, "rebase");

        match mode {
            RebaseMode::Normal => self.start(options, io),
            RebaseMode::Aborting => {
                io.info("Aborting rebase operation...");
                self.control("abort", "Rebase operation aborted", "Rebase aborted successfully.", io)
            }
            RebaseMode::Continuing => {
                if self.ctx.gateway.has_uncommitted_changes()? {
                    io.error("Please resolve all conflicts and stage your changes before continuing.");
                    io.info("Use 'git add <file>' to stage resolved files, then run rebase --continue again.");
                    return Ok(ActionResult::failure(
                        "Rebase continue failed: Unresolved conflicts",
                        json!({ "action": "continue" }),
                    ));
                }
                io.info("Continuing rebase operation...");
                self.control("continue", "Rebase operation continued", "Rebase continued successfully.", io)
            }
            RebaseMode::Skipping => {
                io.info("Skipping current commit in rebase...");
                self.control("skip", "Rebase skip completed", "Current commit skipped successfully.", io)
            }
        }
    }

    fn start(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        if self.ctx.gateway.has_uncommitted_changes()? {
            io.error("Cannot rebase with uncommitted changes. Please commit or stash your changes first.");
            return Ok(ActionResult::failure(
                "Rebase failed: Uncommitted changes detected",
                Value::Null,
            ));
        }

        let branch = self.ctx.branch_or_current(options)?;
        let onto = non_blank(options.onto.as_deref());
        let args = rebase_command(&branch, options.interactive, onto);

        io.info("Starting rebase operation...");
        match self.ctx.gateway.run(&args) {
            Ok(output) => {
                if options.interactive {
                    io.info("Interactive rebase completed. Please check the result.");
                } else {
                    io.info("Rebase completed successfully.");
                }
                Ok(ActionResult::success(
                    format!("Successfully rebased onto {}", branch),
                    json!({
                        "branch": branch,
                        "interactive": options.interactive,
                        "onto": onto,
                        "output": output.text(),
                    }),
                ))
            }
            Err(err) if err.is_conflict() => {
                Ok(self.conflicts(&err, json!({ "branch": branch }), io))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Run `rebase --<flag>` for the abort/continue/skip transitions.
    fn control(
        &self,
        flag: &str,
        message: &str,
        done: &str,
        io: &mut dyn ConsoleIo,
    ) -> Result<ActionResult, ActionError> {
        let option = format!("--{}", flag);

        match self.ctx.gateway.run(&["rebase", option.as_str()]) {
            Ok(output) => {
                io.info(done);
                Ok(ActionResult::success(
                    message,
                    json!({ "action": flag, "output": output.text() }),
                ))
            }
            Err(err) if err.is_conflict() => Ok(self.conflicts(&err, json!({ "action": flag }), io)),
            Err(err) => Err(err.into()),
        }
    }

    fn conflicts(&self, err: &GitError, mut data: Value, io: &mut dyn ConsoleIo) -> ActionResult {
        debug!(error = %err, "rebase stopped on conflicts");
        io.warn("Rebase conflicts detected. Please resolve conflicts and run:");
        io.info("  gk rebase --continue  (after resolving conflicts)");
        io.info("  gk rebase --abort     (to cancel rebase)");
        io.info("  gk rebase --skip      (to skip current commit)");

        if let Value::Object(map) = &mut data {
            map.insert("conflicts".to_string(), Value::Bool(true));
            map.insert("output".to_string(), Value::String(err.failure_text()));
        }
        ActionResult::failure("Rebase conflicts require manual resolution", data)
    }
}

impl Action for RebaseAction {
    fn name(&self) -> &'static str {
        "rebase"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        let verb = match RebaseMode::from_options(options) {
            RebaseMode::Normal => "Rebase",
            RebaseMode::Aborting => "Rebase abort",
            RebaseMode::Continuing => "Rebase continue",
            RebaseMode::Skipping => "Rebase skip",
        };
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail(verb, &err, io),
        }
    }
}
