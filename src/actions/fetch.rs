//! actions::fetch

use serde_json::json;

use super::{fail, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Fetch changes from remote repository without merging";

pub struct FetchAction {
    ctx: ActionContext,
}

impl FetchAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let output = self.ctx.gateway.run(&["fetch"])?;
        io.info("Fetch completed successfully");

        Ok(ActionResult::success(
            "Successfully fetched from remote",
            json!({ "output": output.text() }),
        ))
    }
}

impl Action for FetchAction {
    fn name(&self) -> &'static str {
        "fetch"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, _options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(io) {
            Ok(result) => result,
            Err(err) => fail("Fetch", &err, io),
        }
    }
}
