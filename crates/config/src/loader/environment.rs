//! Process environment loader.
//!
//! Responsibilities:
//! - Snapshot the process environment on first lookup.
//! - Normalize requested keys (upper-case by default) before lookup.
//!
//! Invariants:
//! - The snapshot is taken once; later changes to the environment are not seen.
//! - Entries whose name or value is not valid UTF-8 are left out of the snapshot.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;

use super::Loader;
use super::var_format::{self, VarFormat};
use crate::error::ConfigError;
use crate::source::Source;

/// Reads configuration from the process environment.
pub struct Environment {
    var_format: VarFormat,
    configs: OnceCell<HashMap<String, String>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            var_format: var_format::boxed(var_format::upper),
            configs: OnceCell::new(),
        }
    }

    /// Replace the key normalization (default: upper-case).
    pub fn with_var_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.var_format = var_format::boxed(format);
        self
    }

    fn snapshot(&self) -> &HashMap<String, String> {
        self.configs.get_or_init(|| {
            let configs: HashMap<String, String> = std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect();
            tracing::debug!(count = configs.len(), "Snapshotted process environment");
            configs
        })
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("loaded", &self.configs.get().is_some())
            .finish()
    }
}

impl Loader for Environment {
    fn name(&self) -> &'static str {
        "Environment"
    }

    fn lookup(&self, key: &str, _source: Option<&dyn Source>) -> Result<String, ConfigError> {
        self.snapshot()
            .get(&(self.var_format)(key))
            .cloned()
            .ok_or_else(|| ConfigError::not_found(key))
    }
}
