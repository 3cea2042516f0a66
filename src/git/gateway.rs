//! git::gateway
//!
//! The `RepositoryGateway` trait and the types that cross it.
//!
//! Every action talks to the repository through this trait. The production
//! implementation is [`crate::git::Git`]; tests use
//! [`crate::git::mock::MockGateway`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from gateway operations.
#[derive(Debug, Clone, Error)]
pub enum GitError {
    /// No git metadata found at or above the working directory.
    #[error("git repository not found in path: {}", .path.display())]
    RepositoryNotFound {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// A git sub-command exited with a non-zero status.
    ///
    /// The display form carries git's own output verbatim.
    #[error("git command failed: {command} - {}", join_output(.stderr, .stdout))]
    CommandFailed {
        /// The command line as it was run, e.g. `git merge feature/x`
        command: String,
        /// Captured standard error
        stderr: String,
        /// Captured standard output
        stdout: String,
    },

    /// The git binary could not be started.
    #[error("failed to run {command}: {message}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// The OS error
        message: String,
    },

    /// Internal git2 error while querying repository state.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a `CommandFailed` from an argument vector and captured output.
    pub fn command_failed(args: &[&str], stderr: impl Into<String>, stdout: impl Into<String>) -> Self {
        GitError::CommandFailed {
            command: format_command(args),
            stderr: stderr.into(),
            stdout: stdout.into(),
        }
    }

    /// The text git printed for a failed command.
    ///
    /// Prefers stderr; falls back to stdout because merge and rebase report
    /// conflicts there. Empty for other variants.
    pub fn failure_text(&self) -> String {
        match self {
            GitError::CommandFailed { stderr, stdout, .. } => join_output(stderr, stdout),
            _ => String::new(),
        }
    }

    /// Check whether git reported a merge/rebase conflict.
    ///
    /// Matches "conflict" case-insensitively anywhere in git's output.
    pub fn is_conflict(&self) -> bool {
        match self {
            GitError::CommandFailed { stderr, stdout, .. } => {
                contains_conflict_marker(stderr) || contains_conflict_marker(stdout)
            }
            _ => false,
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Join two trimmed outputs, skipping whichever is empty.
fn join_output(first: &str, second: &str) -> String {
    let a = first.trim();
    let b = second.trim();
    match (a.is_empty(), b.is_empty()) {
        (false, true) => a.to_string(),
        (true, false) => b.to_string(),
        (false, false) => format!("{}\n{}", a, b),
        (true, true) => String::new(),
    }
}

/// Case-insensitive search for a conflict marker in git output.
pub fn contains_conflict_marker(text: &str) -> bool {
    text.to_ascii_lowercase().contains("conflict")
}

/// Render an argument vector as a `git ...` command line for messages.
pub fn format_command(args: &[&str]) -> String {
    let mut parts = vec!["git".to_string()];
    for arg in args {
        if arg.is_empty() || arg.chars().any(char::is_whitespace) {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push((*arg).to_string());
        }
    }
    parts.join(" ")
}

/// Output of a successful git sub-command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error (git writes progress here even on success)
    pub stderr: String,
}

impl CommandOutput {
    /// Create an output carrying only stdout text.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Combined, trimmed output suitable for a result payload.
    pub fn text(&self) -> String {
        join_output(&self.stdout, &self.stderr)
    }
}

/// Where to look for a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchScope {
    /// `refs/heads/<name>`
    Local,
    /// `refs/remotes/<remote>/<name>`
    Remote,
}

impl fmt::Display for BranchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchScope::Local => write!(f, "local"),
            BranchScope::Remote => write!(f, "remote"),
        }
    }
}

/// The boundary through which every git sub-command is invoked.
///
/// Implementations never retry and never batch: each `run` call spawns
/// exactly one sub-command, in the order the caller issued them.
pub trait RepositoryGateway {
    /// The checked-out branch, or `None` when HEAD is detached or unborn.
    fn current_branch(&self) -> Result<Option<String>, GitError>;

    /// Forget any memoised query results.
    fn invalidate(&self);

    /// Check whether a branch exists in the given scope.
    fn branch_exists(&self, name: &str, scope: BranchScope) -> Result<bool, GitError>;

    /// True iff the index or working tree differs from HEAD.
    fn has_uncommitted_changes(&self) -> Result<bool, GitError>;

    /// True iff HEAD has commits its upstream lacks.
    ///
    /// Returns `Ok(false)` when no upstream is configured.
    fn has_unpushed_commits(&self) -> Result<bool, GitError>;

    /// Run one git sub-command with a discrete argument vector.
    fn run(&self, args: &[&str]) -> Result<CommandOutput, GitError>;
}
