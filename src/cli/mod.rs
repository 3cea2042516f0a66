//! cli
//!
//! Command-line interface layer for gitkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Resolve the action, open the repository, load configuration once
//! - Render the action result and map it to an exit status
//!
//! # Architecture
//!
//! The CLI layer is thin. Everything that touches the repository happens
//! inside an [`crate::actions::Action`], reached through the
//! [`ActionRegistry`].

pub mod args;

pub use args::Cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::actions::{ActionContext, ActionRegistry, ActionResult};
use crate::core::config::Config;
use crate::git::Git;
use crate::ui::output::{self, Verbosity};
use crate::ui::{ConsoleIo, TerminalIo};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Failed actions are
/// reported here and come back as [`ExitCode::FAILURE`]; only setup
/// problems such as an unreadable config file are returned as errors.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    let mut io = TerminalIo::new(verbosity, cli.interactive());
    let registry = ActionRegistry::with_builtins();

    let Some(name) = cli.action.as_deref() else {
        io.info(&render_catalog(&registry));
        return Ok(ExitCode::SUCCESS);
    };

    if !registry.supports(name) {
        io.error(&format!("Unknown action: {}", name));
        io.info(&render_catalog(&registry));
        return Ok(ExitCode::FAILURE);
    }

    let cwd = match &cli.cwd {
        Some(path) => path.clone(),
        None => current_dir()?,
    };

    let git = match Git::open(&cwd) {
        Ok(git) => git,
        Err(err) => {
            io.error(&err.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };

    let loaded = Config::load(Some(git.work_dir()), Some(git.git_dir()))
        .context("failed to load configuration")?;
    for warning in &loaded.warnings {
        io.warn(&warning.message);
    }
    let config = Rc::new(loaded.config);
    debug!(sources = ?config.sources(), remote = config.remote(), "configuration loaded");

    let git = git.with_remote(config.remote());
    let ctx = ActionContext::new(Rc::new(git), config);

    let action = registry.resolve(name, &ctx)?;
    let result = action.execute(&cli.options(), &mut io);
    render(&result, &mut io);

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to determine current directory")
}

/// Install a stderr fmt subscriber; `--debug` overrides `RUST_LOG`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn render_catalog(registry: &ActionRegistry) -> String {
    format!(
        "Available actions:\n{}",
        output::format_table(&registry.catalog(), "  ")
    )
}

fn render(result: &ActionResult, io: &mut TerminalIo) {
    let data = Value::Object(result.data().clone());
    debug!(success = result.is_success(), %data, "action finished");

    if result.is_success() {
        io.info(result.message());
    } else if io.last_error() != Some(result.message()) {
        io.error(result.message());
    }
}
