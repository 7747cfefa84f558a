//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Describe the chain-building flags shared by `get` and `loaders`.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not assemble loaders (see `chain_context` module).

use clap::{Args, Parser, Subcommand, ValueEnum};
use confchain::constants::{DEFAULT_INI_SECTION, DEFAULT_ROOT_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "confchain")]
#[command(about = "Resolve layered configuration values from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  confchain get DATABASE_URL\n  confchain get DEBUG --cast bool --default false\n  confchain get HOSTS --cast list --ini deploy.cfg --section hosts\n  confchain get PORT --config PORT=9000\n  confchain find .env '*.cfg' --all\n  confchain loaders --search .env\n"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a key through the loader chain and print its value
    Get(GetArgs),

    /// Search for configuration files from a directory up to a root
    Find {
        /// Glob patterns matched in each directory (e.g. `.env`, `*.cfg`)
        #[arg(required = true, value_name = "PATTERN")]
        patterns: Vec<String>,

        /// Directory the search starts from
        #[arg(long, default_value = ".")]
        start: PathBuf,

        /// Outermost directory searched (inclusive)
        #[arg(long, default_value = DEFAULT_ROOT_PATH)]
        root: PathBuf,

        /// Print every match instead of the nearest one
        #[arg(long)]
        all: bool,
    },

    /// Print the loader chain in precedence order
    Loaders(ChainArgs),
}

#[derive(Args)]
pub struct GetArgs {
    /// Configuration key to resolve
    pub key: String,

    /// Cast applied to the resolved value
    #[arg(long, value_enum, default_value_t = CastKind::Raw)]
    pub cast: CastKind,

    /// Value used when no loader has the key
    #[arg(long)]
    pub default: Option<String>,

    #[command(flatten)]
    pub chain: ChainArgs,
}

/// Flags that shape the loader chain.
#[derive(Args, Debug, Default)]
pub struct ChainArgs {
    /// Highest-precedence values (repeatable)
    #[arg(long = "config", value_name = "KEY=VALUE")]
    pub config: Vec<String>,

    /// Env files read in order, later files overriding earlier ones (repeatable)
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_files: Vec<PathBuf>,

    /// INI file to read instead of `setup.cfg`
    #[arg(long, value_name = "PATH")]
    pub ini: Option<PathBuf>,

    /// INI section holding the values
    #[arg(long, default_value = DEFAULT_INI_SECTION)]
    pub section: String,

    /// Discover env files by glob pattern instead of reading `.env` (repeatable)
    #[arg(long = "search", value_name = "PATTERN", conflicts_with = "env_files")]
    pub search: Vec<String>,

    /// Directory env file discovery starts from
    #[arg(long, default_value = ".")]
    pub start: PathBuf,

    /// Outermost directory env file discovery visits (inclusive)
    #[arg(long, default_value = DEFAULT_ROOT_PATH)]
    pub root: PathBuf,

    /// Leave the process environment out of the chain
    #[arg(long)]
    pub no_env: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CastKind {
    /// The value as found
    Raw,
    /// Boolean tokens (1/0, true/false, yes/no, on/off)
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Delimited list, printed as a JSON array
    List,
    /// Parenthesized tuple, printed as a JSON array
    Tuple,
    /// JSON document, printed compactly
    Json,
    /// Literal value, printed as JSON
    Eval,
}
