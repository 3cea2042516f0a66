//! actions::checkout

use serde_json::json;

use super::{fail, non_blank, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Switch to a different branch";

/// `checkout <branch>`, asking for the branch when it is not given.
pub struct CheckoutAction {
    ctx: ActionContext,
}

impl CheckoutAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let branch = match non_blank(options.branch.as_deref()) {
            Some(branch) => branch.to_string(),
            None => io.ask("Branch name:", None)?.trim().to_string(),
        };
        if branch.is_empty() {
            return Err(ActionError::InvalidArgument(
                "branch name is required".to_string(),
            ));
        }

        self.ctx.gateway.run(&["checkout", branch.as_str()])?;
        io.info(&format!("Switched to branch: {}", branch));

        Ok(ActionResult::success(
            format!("Successfully switched to {}", branch),
            json!({ "branch": branch }),
        ))
    }
}

impl Action for CheckoutAction {
    fn name(&self) -> &'static str {
        "checkout"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail("Checkout", &err, io),
        }
    }
}
