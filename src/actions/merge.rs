//! actions::merge
//!
//! Merge one source branch into one or more targets.
//!
//! # Algorithm
//!
//! Targets are processed one at a time since each merge moves the checkout:
//! `checkout <target>`, `merge <source>`, then `push <remote> <target>`.
//! A failed checkout or merge marks only that target as failed; later
//! targets still run. A failed push is a warning because the merge itself
//! already landed locally.
//!
//! Afterwards the branch that was checked out at the start is restored,
//! unless it is the last target (where the checkout already is).

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::{fail, non_blank, Action, ActionContext, ActionError, ActionOptions, ActionResult};
use crate::git::GitError;
use crate::ui::output::format_list;
use crate::ui::ConsoleIo;

pub const DESCRIPTION: &str = "Merge one branch into one or multiple target branches with auto-push. \
Use --source and --target for clarity, or --merge and --branch for legacy support.";

/// Result of merging into one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: String,
    /// `None` when the merge succeeded.
    pub error: Option<String>,
}

/// Per-target outcomes in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    outcomes: Vec<TargetOutcome>,
}

impl MergeOutcome {
    pub fn record_success(&mut self, target: &str) {
        self.outcomes.push(TargetOutcome {
            target: target.to_string(),
            error: None,
        });
    }

    pub fn record_failure(&mut self, target: &str, error: impl Into<String>) {
        self.outcomes.push(TargetOutcome {
            target: target.to_string(),
            error: Some(error.into()),
        });
    }

    pub fn outcomes(&self) -> &[TargetOutcome] {
        &self.outcomes
    }

    /// Targets that merged, in order.
    pub fn merged(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.error.is_none())
            .map(|o| o.target.as_str())
            .collect()
    }

    /// `(target, error)` for targets that failed, in order.
    pub fn failed(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_deref().map(|e| (o.target.as_str(), e)))
            .collect()
    }

    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.merged().len()
    }

    pub fn failure_count(&self) -> usize {
        self.total_count() - self.success_count()
    }

    /// Build the final result for merging `source`.
    ///
    /// None merged is a failure; anything else is a success, partial or not.
    pub fn into_result(self, source: &str) -> ActionResult {
        let merged = self.merged();
        let failed: Vec<Value> = self
            .failed()
            .into_iter()
            .map(|(branch, error)| json!({ "branch": branch, "error": error }))
            .collect();

        let data = json!({
            "source": source,
            "merged_branches": merged,
            "failed_branches": failed,
            "total_count": self.total_count(),
            "success_count": self.success_count(),
            "failure_count": self.failure_count(),
        });

        if self.success_count() == 0 {
            ActionResult::failure(
                format!("Failed to merge {} into any target branches", source),
                data,
            )
        } else if self.failure_count() == 0 {
            let message = if merged.len() == 1 {
                format!(
                    "Successfully merged {} into {} and pushed to remote",
                    source, merged[0]
                )
            } else {
                format!(
                    "Successfully merged {} into {} branches: {} and pushed to remote",
                    source,
                    merged.len(),
                    merged.join(", ")
                )
            };
            ActionResult::success(message, data)
        } else {
            ActionResult::success(
                format!(
                    "Partially merged {}: {} succeeded, {} failed",
                    source,
                    self.success_count(),
                    self.failure_count()
                ),
                data,
            )
        }
    }
}

/// Split a comma-separated target list.
///
/// Entries are trimmed and blanks dropped.
///
/// # Errors
///
/// [`ActionError::InvalidArgument`] when the value has a space but no comma
/// (an unquoted shell argument) or contains no names at all.
///
/// # Example
///
/// ```
/// use gitkit::actions::merge::parse_targets;
///
/// assert_eq!(parse_targets("dev, staging,,main").unwrap(), vec!["dev", "staging", "main"]);
/// assert!(parse_targets("dev staging").is_err());
/// ```
pub fn parse_targets(value: &str) -> Result<Vec<String>, ActionError> {
    let value = value.trim();
    if value.contains(' ') && !value.contains(',') {
        return Err(ActionError::InvalidArgument(format!(
            "Branch names with spaces detected. Use quotes around the entire --target argument: --target=\"{}\"",
            value
        )));
    }

    let targets: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    if targets.is_empty() {
        return Err(ActionError::InvalidArgument(format!(
            "No valid branch names found in: {}",
            value
        )));
    }

    Ok(targets)
}

pub struct MergeAction {
    ctx: ActionContext,
}

impl MergeAction {
    pub fn new(ctx: &ActionContext) -> Self {
        Self { ctx: ctx.clone() }
    }

    fn run(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<ActionResult, ActionError> {
        let source = self.source_branch(options, io)?;
        let targets = self.target_branches(options)?;
        let original = self.ctx.gateway.current_branch()?;
        debug!(source = %source, ?targets, ?original, "merging");

        let mut outcome = MergeOutcome::default();
        for target in &targets {
            io.info(&format!("Merging {} into {}...", source, target));
            match self.merge_into(&source, target) {
                Ok(()) => {
                    io.info(&format!("Successfully merged {} into {}", source, target));
                    self.push_safely(target, io);
                    outcome.record_success(target);
                }
                Err(err) => {
                    let text = err.to_string();
                    info!(branch = %target, error = %text, "merge failed");
                    io.error(&format!(
                        "Failed to merge {} into {}: {}",
                        source, target, text
                    ));
                    outcome.record_failure(target, text);
                }
            }
        }

        if outcome.total_count() > 1 && outcome.failure_count() > 0 {
            let failed: Vec<&str> = outcome.failed().into_iter().map(|(branch, _)| branch).collect();
            io.warn(&format!(
                "Could not merge {} into:\n{}",
                source,
                format_list(&failed, "  - ")
            ));
        }

        let restore_error = self.restore(original.as_deref(), targets.last(), io);

        let result = outcome.into_result(&source);
        Ok(match restore_error {
            Some(error) => with_entry(result, "restore_error", Value::String(error)),
            None => result,
        })
    }

    fn source_branch(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> Result<String, ActionError> {
        if let Some(source) = non_blank(options.source.as_deref()).or(non_blank(options.merge.as_deref())) {
            return Ok(source.to_string());
        }

        let current = self.ctx.gateway.current_branch()?;
        let question = format!(
            "Source branch to merge: [blank for current branch `{}`]",
            current.as_deref().unwrap_or("")
        );
        let answer = io.ask(&question, Some(""))?;
        match non_blank(Some(answer.as_str())) {
            Some(source) => Ok(source.to_string()),
            None => current.ok_or(ActionError::NoCurrentBranch),
        }
    }

    fn target_branches(&self, options: &ActionOptions) -> Result<Vec<String>, ActionError> {
        match non_blank(options.target.as_deref()).or(non_blank(options.branch.as_deref())) {
            Some(value) => parse_targets(value),
            None => {
                let current = self
                    .ctx
                    .gateway
                    .current_branch()?
                    .ok_or(ActionError::NoCurrentBranch)?;
                Ok(vec![current])
            }
        }
    }

    fn merge_into(&self, source: &str, target: &str) -> Result<(), GitError> {
        self.ctx.gateway.run(&["checkout", target])?;
        self.ctx.gateway.run(&["merge", source])?;
        Ok(())
    }

    fn push_safely(&self, target: &str, io: &mut dyn ConsoleIo) {
        match self.ctx.gateway.run(&["push", self.ctx.remote(), target]) {
            Ok(_) => io.info(&format!("Pushed {} to remote repository", target)),
            Err(err) => {
                warn!(branch = %target, error = %err, "push after merge failed");
                io.warn(&format!("Failed to push {}: {}", target, err));
            }
        }
    }

    /// Check out `original` again unless the last target is already it.
    fn restore(&self, original: Option<&str>, last: Option<&String>, io: &mut dyn ConsoleIo) -> Option<String> {
        let original = original?;
        if last.map(String::as_str) == Some(original) {
            return None;
        }

        match self.ctx.gateway.run(&["checkout", original]) {
            Ok(_) => {
                io.info(&format!("Returned to original branch: {}", original));
                None
            }
            Err(err) => {
                io.warn(&format!(
                    "Failed to return to original branch {}: {}",
                    original, err
                ));
                Some(err.to_string())
            }
        }
    }
}

fn with_entry(result: ActionResult, key: &str, value: Value) -> ActionResult {
    let mut data = result.data().clone();
    data.insert(key.to_string(), value);
    if result.is_success() {
        ActionResult::success(result.message(), Value::Object(data))
    } else {
        ActionResult::failure(result.message(), Value::Object(data))
    }
}

impl Action for MergeAction {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn execute(&self, options: &ActionOptions, io: &mut dyn ConsoleIo) -> ActionResult {
        match self.run(options, io) {
            Ok(result) => result,
            Err(err) => fail("Merge operation", &err, io),
        }
    }
}
