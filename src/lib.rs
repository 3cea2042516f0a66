//! gitkit - a convenience layer over git
//!
//! gitkit looks at the state of a repository and runs the git sub-commands a
//! workflow needs: committing and pushing only what is pending, merging one
//! branch into several targets, and driving a rebase through its
//! continue/abort/skip steps.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, resolves actions)
//! - [`actions`] - The verbs, their registry and the result type
//! - [`core`] - Configuration, branch naming, commit messages, events
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - User interaction utilities
//!
//! # Invariants
//!
//! 1. Actions reach git only through [`git::RepositoryGateway`]
//! 2. Git arguments are passed as a discrete argv, never a shell string
//! 3. Every git sub-command is attempted exactly once
//! 4. Actions never return errors; failures are [`actions::ActionResult`]s

pub mod actions;
pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
