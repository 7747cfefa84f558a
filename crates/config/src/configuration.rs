//! Public resolution entry point.
//!
//! Responsibilities:
//! - Resolve a key through the loader chain, fall back to a default, and cast.
//! - Provide a lazily built process-wide `Configuration` via [`config`].
//!
//! Does NOT handle:
//! - Caching; loaders own their caches, the resolver holds none.
//!
//! Invariants:
//! - Resolution is total: a chain value, the caller's default, or
//!   `ConfigError::UnknownConfiguration`. `None` as default means "no default".
//! - The cast runs exactly once, on the final raw value (chain or default).

use std::fmt;
use std::sync::OnceLock;

use crate::casts::{self, Cast};
use crate::chain::Loaders;
use crate::error::ConfigError;
use crate::source::Source;

/// Resolves configuration keys against an ordered loader chain.
#[derive(Default)]
pub struct Configuration {
    loaders: Loaders,
}

impl Configuration {
    pub fn new(loaders: Loaders) -> Self {
        Self { loaders }
    }

    pub fn loaders(&self) -> &Loaders {
        &self.loaders
    }

    /// Resolve `key`, apply `default` on a miss, then `cast` the result.
    ///
    /// `source` is forwarded to every loader as an override of its bound source.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnknownConfiguration` if no loader has the key and no default is given.
    /// - `ConfigError::InvalidValue` if the cast rejects the resolved value.
    /// - Any loader failure (invalid file, source mismatch, I/O).
    pub fn resolve<T, C>(
        &self,
        key: &str,
        cast: C,
        source: Option<&dyn Source>,
        default: Option<&str>,
    ) -> Result<T, ConfigError>
    where
        C: Cast<T>,
    {
        let raw = match self.loaders.get_config(key, source) {
            Ok(value) => value,
            Err(e) if e.is_not_found() => match default {
                Some(default) => {
                    tracing::trace!(key, "Using default for configuration key");
                    default.to_string()
                }
                None => {
                    return Err(ConfigError::UnknownConfiguration {
                        key: key.to_string(),
                    });
                }
            },
            Err(e) => return Err(e),
        };

        cast.cast(&raw).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Raw string value of `key`.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        self.resolve(key, casts::raw, None, None)
    }

    /// Raw string value of `key`, or `default` if no loader has it.
    pub fn get_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        self.resolve(key, casts::raw, None, Some(default))
    }

    /// Typed value of `key`.
    pub fn get_as<T>(&self, key: &str, cast: impl Cast<T>) -> Result<T, ConfigError> {
        self.resolve(key, cast, None, None)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("loaders", &self.loaders)
            .finish()
    }
}

/// Process-wide configuration using the default loader chain.
///
/// Built on first call; loaders then load lazily on their first lookup.
pub fn config() -> &'static Configuration {
    static CONFIG: OnceLock<Configuration> = OnceLock::new();
    CONFIG.get_or_init(Configuration::default)
}
