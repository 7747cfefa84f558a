//! Confchain CLI - resolve layered configuration from shell scripts.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Resolve keys and discover files via the `confchain` library.
//! - Print values to stdout and map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Loader or cast semantics (see `crates/config`).
//!
//! Invariants:
//! - Logging goes to stderr so stdout carries only values and paths.
//! - Log verbosity is controlled by `RUST_LOG`; nothing is logged by default.

mod args;
mod chain_context;
mod commands;
mod dispatch;
mod error;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::ExitCodeExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(e.exit_code().as_i32());
    }
}
