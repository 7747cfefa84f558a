//! Layered configuration resolution.
//!
//! This crate resolves configuration values by consulting an ordered chain of
//! loaders (command line, process environment, env files, INI files) and
//! returning the first match, with optional casting and default fallback.
//!
//! ```no_run
//! use confchain::{casts, config};
//!
//! let debug: bool = config().resolve("DEBUG", casts::boolean, None, Some("false"))?;
//! let url = config().get("DATABASE_URL")?;
//! # Ok::<(), confchain::ConfigError>(())
//! ```

pub mod casts;
mod chain;
mod configuration;
pub mod constants;
mod discovery;
mod error;
pub mod loader;
pub mod parser;
mod source;

pub use casts::{Cast, Choice, List, Tuple};
pub use chain::Loaders;
pub use configuration::{Configuration, config};
pub use discovery::{FindAll, RecursiveFileSearchSource};
pub use error::{CastError, ConfigError};
pub use loader::{CommandLine, EnvFile, Environment, IniFile, Loader};
pub use parser::{DotenvParser, FileParser, IniParser, ParseError};
pub use source::{FileSource, Source, SourceKind, SourceStream, SourceStreams};
