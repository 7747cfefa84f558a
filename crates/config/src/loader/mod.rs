//! Configuration loaders: one strategy per kind of backing store.
//!
//! Responsibilities:
//! - Define the `Loader` contract used by the chain (`get_config` / `lookup`).
//! - Reject source overrides a loader cannot read.
//! - Provide the four built-in loaders: command line, environment, env file, INI file.
//!
//! Does NOT handle:
//! - Precedence between loaders (see `chain`).
//! - Defaults and casting (see `configuration`).
//!
//! Invariants / Assumptions:
//! - A loader reports an absent key with `ConfigError::NotFound` and nothing else.
//! - Caches are filled at most once per loader instance and never refreshed.
//!   The cells are `once_cell::sync::OnceCell`, so concurrent first lookups are
//!   safe; a load that fails leaves the cell empty and the next lookup retries.
//! - Key normalization (`var_format`) is loader-local.

mod command_line;
mod env_file;
mod environment;
mod ini_file;
pub mod var_format;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

pub use command_line::CommandLine;
pub use env_file::EnvFile;
pub use environment::Environment;
pub use ini_file::IniFile;
pub use var_format::VarFormat;

use crate::error::ConfigError;
use crate::parser::{FileParser, ParseError};
use crate::source::{Source, SourceKind};

/// Retrieves single configuration values from one kind of store.
pub trait Loader: fmt::Debug + Send + Sync {
    /// Short name used in logs and mismatch errors.
    fn name(&self) -> &'static str;

    /// Whether a source override of `kind` can be read by this loader.
    ///
    /// Loaders that do not read sources accept (and ignore) every override.
    fn accepts(&self, kind: SourceKind) -> bool {
        let _ = kind;
        true
    }

    /// Look `key` up, loading from `source` (or the bound source) if needed.
    fn lookup(&self, key: &str, source: Option<&dyn Source>) -> Result<String, ConfigError>;

    /// Validate the override, then look `key` up.
    ///
    /// # Errors
    ///
    /// - `ConfigError::SourceMismatch` if the override is of a kind the loader cannot read.
    /// - `ConfigError::NotFound` if the key is absent.
    /// - Any load failure of the underlying source.
    fn get_config(&self, key: &str, source: Option<&dyn Source>) -> Result<String, ConfigError> {
        if let Some(source) = source {
            if !self.accepts(source.kind()) {
                return Err(ConfigError::SourceMismatch {
                    loader: self.name().to_string(),
                    found: source.kind(),
                });
            }
        }
        self.lookup(key, source)
    }
}

/// Read every stream of `source` through `parser`, later streams winning.
pub(crate) fn load_files(
    source: &dyn Source,
    parser: &dyn FileParser,
) -> Result<HashMap<String, String>, ConfigError> {
    let mut configs = HashMap::new();

    for stream in source.streams()? {
        let mut stream = stream?;
        let values = parser.parse(stream.reader()).map_err(|e| match e {
            ParseError::Syntax { line } => ConfigError::InvalidConfigurationFile {
                path: stream.path().to_path_buf(),
                line,
            },
            ParseError::Io(io) => ConfigError::Io {
                path: stream.path().to_path_buf(),
                source: io,
            },
        })?;
        tracing::trace!(path = %stream.path().display(), count = values.len(), "Parsed configuration file");
        configs.extend(values);
    }

    Ok(configs)
}
