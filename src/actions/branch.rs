//! actions::branch
//!
//! Create a branch and switch to it.
//!
//! An explicit `--branch` is only sanitized. Without it the user picks a
//! branch type, a name, an area and an optional prefix, and the parts are
//! composed with [`format_branch_name`].

use serde_json::json;

use super::{fail, non_blank, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::core::events::DomainEvent;
use crate::core::naming::{format_branch_name, sanitize_branch_name};
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Create a new branch and switch to it";

/// Area used when the user leaves it blank.
pub const DEFAULT_AREA: &str = "general";

pub struct BranchAction {
    ctx: ActionContext,
}

impl BranchAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let name = self.branch_name(options, io)?;
        let from = self.ctx.gateway.current_branch()?;

        self.ctx.gateway.run(&["checkout", "-b", name.as_str()])?;
        self.ctx
            .events
            .publish(&DomainEvent::branch_created(&name, from.as_deref()));
        io.info(&format!("Created and switched to branch: {}", name));

        Ok(ActionResult::success(
            format!("Successfully created branch {}", name),
            json!({ "branch": name, "from": from }),
        ))
    }

    fn branch_name(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<String, ActionError> {
        if let Some(branch) = non_blank(options.branch.as_deref()) {
            return Ok(sanitize_branch_name(branch)?);
        }

        let kind = io.choice("Branch type:", &self.ctx.config.branch_types(), None)?;
        let name = io.ask("Branch name:", None)?;
        let area = io.ask("Feature area (optional):", Some(DEFAULT_AREA))?;
        let prefix = io.ask("Prefix (optional):", Some(""))?;

        Ok(format_branch_name(&name, &kind, &area, &prefix)?)
    }
}

impl Action for BranchAction {
    fn name(&self) -> &'static str {
        "branch"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail("Branch creation", &err, io),
        }
    }
}
