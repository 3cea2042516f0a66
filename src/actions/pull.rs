//! actions::pull

use serde_json::json;

use super::{fail, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Pull changes from remote repository";

/// `pull <remote> <branch>`, branch defaulting to the current one.
pub struct PullAction {
    ctx: ActionContext,
}

impl PullAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let branch = self.ctx.branch_or_current(options)?;
        io.info(&format!("Pulling from branch: {}", branch));

        let output = self.ctx.gateway.run(&["pull", self.ctx.remote(), branch.as_str()])?;
        io.info("Pull completed successfully");

        Ok(ActionResult::success(
            format!("Successfully pulled from {}", branch),
            json!({ "branch": branch, "output": output.text() }),
        ))
    }
}

impl Action for PullAction {
    fn name(&self) -> &'static str {
        "pull"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail("Pull", &err, io),
        }
    }
}
