//! Error types for configuration resolution.
//!
//! Responsibilities:
//! - Define one error variant per failure the loader chain can report.
//! - Distinguish the recoverable "not found" signal from terminal failures.
//! - Provide `CastError` for value conversions performed by casts.
//!
//! Does NOT handle:
//! - Exit code mapping (see the CLI crate's `error.rs`).
//!
//! Invariants:
//! - All error variants include context for debugging (keys, paths, patterns).
//! - File parse errors NEVER include raw line contents to prevent secret leakage;
//!   only the line number is reported.

use std::path::PathBuf;
use thiserror::Error;

use crate::source::SourceKind;

/// Errors that can occur while resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key is absent from a loader or from the whole chain.
    ///
    /// This is the only recoverable variant: the chain falls through to the
    /// next loader, and the resolver falls back to the caller's default.
    #[error("Configuration key '{key}' not found")]
    NotFound { key: String },

    /// No loader and no default produced a value.
    #[error("Configuration '{key}' not found")]
    UnknownConfiguration { key: String },

    /// A bound file could not be parsed by the loader's parser.
    ///
    /// SAFETY: Only the line number of the failure is included, never its content.
    #[error("Error parsing {} at line {line}", path.display())]
    InvalidConfigurationFile { path: PathBuf, line: usize },

    /// A discovery start path is empty, outside the root, or missing.
    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// No file matched the requested patterns within the search boundary.
    #[error("Cannot find one file with the patterns {patterns:?}")]
    FileNotFound { patterns: Vec<String> },

    /// A caller-supplied source override is not a kind the loader reads.
    #[error("Loader {loader} does not accept a {found} source")]
    SourceMismatch {
        loader: String,
        found: SourceKind,
    },

    /// A resolved value could not be converted by the requested cast.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// A discovery glob pattern is malformed.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A file exists but could not be opened or read.
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A caller-built argument parser rejected the arguments.
    #[error("Failed to parse command line: {0}")]
    CommandLine(#[from] clap::Error),
}

impl ConfigError {
    /// Build the recoverable not-found signal for `key`.
    pub fn not_found(key: impl Into<String>) -> Self {
        ConfigError::NotFound { key: key.into() }
    }

    /// Returns true for the recoverable "key not found" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

/// Failure raised by a cast when a raw value does not convert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CastError {
    message: String,
}

impl CastError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_found_is_recoverable() {
        assert!(ConfigError::not_found("FOO").is_not_found());
        assert!(
            !ConfigError::UnknownConfiguration {
                key: "FOO".to_string()
            }
            .is_not_found()
        );
        assert!(
            !ConfigError::FileNotFound {
                patterns: vec![".env".to_string()]
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_unknown_configuration_names_key() {
        let err = ConfigError::UnknownConfiguration {
            key: "NOPE".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration 'NOPE' not found");
    }

    #[test]
    fn test_invalid_file_message_has_no_content() {
        let err = ConfigError::InvalidConfigurationFile {
            path: PathBuf::from("/srv/app/.env"),
            line: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("/srv/app/.env"));
        assert!(msg.contains("line 3"));
    }
}
