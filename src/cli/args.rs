//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output; implies `--no-input`
//! - `--no-input`: Never prompt; use defaults or fail

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::actions::ActionOptions;

/// gitkit - push, merge and rebase without remembering the git incantations
#[derive(Parser, Debug)]
#[command(name = "gk")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Commit everything and push the current branch
    gk push -m \"fix: handle empty input\"

    # Merge a feature branch into two targets and push both
    gk merge --source feature/login --target dev,staging

    # Resume a rebase after resolving conflicts
    gk rebase --continue")]
pub struct Cli {
    /// Action to run; omit to list the available actions
    pub action: Option<String>,

    /// Branch to act on (target branch for merge, legacy)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Commit message, used verbatim
    #[arg(short, long)]
    pub message: Option<String>,

    /// Commit type for the generated commit message
    #[arg(long = "type", value_name = "TYPE")]
    pub commit_type: Option<String>,

    /// Branch to merge from
    #[arg(long)]
    pub source: Option<String>,

    /// Branch to merge from (legacy alias of --source)
    #[arg(long = "merge", value_name = "BRANCH")]
    pub merge_source: Option<String>,

    /// Comma-separated branches to merge into
    #[arg(long)]
    pub target: Option<String>,

    /// Run an interactive rebase
    #[arg(short, long)]
    pub interactive: bool,

    /// Rebase onto this ref (`rebase --onto <ref> <branch>`)
    #[arg(long)]
    pub onto: Option<String>,

    /// Abort the rebase in progress
    #[arg(long)]
    pub abort: bool,

    /// Continue the rebase in progress
    #[arg(long = "continue")]
    pub continue_rebase: bool,

    /// Skip the current commit of the rebase in progress
    #[arg(long)]
    pub skip: bool,

    /// Run as if gk was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-input
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Never prompt; use defaults or fail
    #[arg(long, global = true)]
    pub no_input: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether prompts may be shown.
    ///
    /// False with `--no-input` or `--quiet`, or when stdin is not a terminal.
    pub fn interactive(&self) -> bool {
        !(self.no_input || self.quiet) && std::io::stdin().is_terminal()
    }

    /// The option bag handed to the action.
    pub fn options(&self) -> ActionOptions {
        ActionOptions {
            branch: self.branch.clone(),
            message: self.message.clone(),
            commit_type: self.commit_type.clone(),
            source: self.source.clone(),
            merge: self.merge_source.clone(),
            target: self.target.clone(),
            interactive: self.interactive,
            onto: self.onto.clone(),
            abort: self.abort,
            continue_rebase: self.continue_rebase,
            skip: self.skip,
        }
    }
}
