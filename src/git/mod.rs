//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Actions depend on the
//! [`RepositoryGateway`] trait, never on `git2` or `std::process` directly.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - State queries: current branch, dirty tree, unpushed commits, branch existence
//! - Running git sub-commands with a discrete argument vector
//!
//! # Invariants
//!
//! - Arguments are never joined into a shell string
//! - Every `run` call spawns exactly one sub-command; no retries
//! - The memoised current branch is dropped after every `run`

mod gateway;
mod interface;
pub mod mock;

pub use gateway::{
    contains_conflict_marker, format_command, BranchScope, CommandOutput, GitError,
    RepositoryGateway,
};
pub use interface::Git;
