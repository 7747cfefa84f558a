//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Exit code selection (see `error` module and `main()`).
//!
//! Invariants:
//! - Commands are routed based on the top-level Commands enum variant.
//! - Only command output goes to stdout; diagnostics go to stderr.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Get(args) => commands::get::run(args)?,
        Commands::Find {
            patterns,
            start,
            root,
            all,
        } => commands::find::run(&patterns, &start, &root, all)?,
        Commands::Loaders(args) => commands::loaders::run(&args)?,
    }
    Ok(())
}
