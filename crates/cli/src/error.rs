//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Codes keep the same meaning across subcommands.

use confchain::ConfigError;

/// Structured exit codes for confchain.
///
/// These codes let scripts tell a missing value apart from a broken
/// configuration file or an unusable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    #[allow(dead_code)]
    Success = 0,

    /// General error - unhandled or generic failure (I/O, unexpected state).
    GeneralError = 1,

    /// Not found - no value for the key and no default, or no matching file.
    ///
    /// Scripts may supply a default or create the missing file.
    NotFound = 4,

    /// Validation error - bad value for a cast, malformed file, bad path or pattern.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            // Not found (exit code 4)
            ConfigError::NotFound { .. } => ExitCode::NotFound,
            ConfigError::UnknownConfiguration { .. } => ExitCode::NotFound,
            ConfigError::FileNotFound { .. } => ExitCode::NotFound,

            // Validation errors (exit code 5)
            ConfigError::InvalidValue { .. } => ExitCode::ValidationError,
            ConfigError::InvalidConfigurationFile { .. } => ExitCode::ValidationError,
            ConfigError::InvalidPath { .. } => ExitCode::ValidationError,
            ConfigError::InvalidPattern { .. } => ExitCode::ValidationError,
            ConfigError::SourceMismatch { .. } => ExitCode::ValidationError,
            ConfigError::CommandLine(_) => ExitCode::ValidationError,

            // Default: general error
            ConfigError::Io { .. } => ExitCode::GeneralError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no `ConfigError` is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
