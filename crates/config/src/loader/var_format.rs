//! Key normalization functions applied by loaders before lookup.

use std::sync::Arc;

/// Maps a requested key to the key a loader stores internally.
pub type VarFormat = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// `debug` -> `DEBUG`. Default for environment-style loaders.
pub fn upper(key: &str) -> String {
    key.to_uppercase()
}

pub fn lower(key: &str) -> String {
    key.to_lowercase()
}

pub fn identity(key: &str) -> String {
    key.to_string()
}

pub(crate) fn boxed<F>(format: F) -> VarFormat
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    Arc::new(format)
}
