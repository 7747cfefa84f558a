//! Ordered loader chain.
//!
//! Responsibilities:
//! - Hold loaders in precedence order (first registered wins).
//! - Try each loader for a key and return the first hit.
//!
//! Does NOT handle:
//! - Defaults or casting; an exhausted chain reports `NotFound` and the
//!   resolver decides what to do with it (see `configuration`).
//!
//! Invariants:
//! - Order is fixed by construction; `push` only appends at lowest precedence.
//! - Only `ConfigError::NotFound` falls through; every other error stops the chain.

use std::fmt;

use crate::error::ConfigError;
use crate::loader::{CommandLine, EnvFile, Environment, IniFile, Loader};
use crate::source::Source;

/// The ordered list of loaders consulted for every key.
pub struct Loaders {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for Loaders {
    /// `CommandLine`, `Environment`, `EnvFile`, `IniFile`, in that order.
    fn default() -> Self {
        Self::new(vec![
            Box::new(CommandLine::new()),
            Box::new(Environment::new()),
            Box::new(EnvFile::new()),
            Box::new(IniFile::new()),
        ])
    }
}

impl Loaders {
    pub fn new(loaders: Vec<Box<dyn Loader>>) -> Self {
        Self { loaders }
    }

    /// A chain with no loaders; every lookup is "not found".
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append a loader with the lowest precedence so far.
    pub fn push(&mut self, loader: impl Loader + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Builder form of [`Loaders::push`].
    pub fn with(mut self, loader: impl Loader + 'static) -> Self {
        self.push(loader);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Loader> {
        self.loaders.iter().map(|loader| &**loader)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Return the value from the first loader that has `key`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if every loader reports the key absent.
    /// - Any other loader error, unchanged.
    pub fn get_config(&self, key: &str, source: Option<&dyn Source>) -> Result<String, ConfigError> {
        for loader in &self.loaders {
            match loader.get_config(key, source) {
                Ok(value) => {
                    tracing::trace!(key, loader = loader.name(), "Resolved configuration key");
                    return Ok(value);
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ConfigError::not_found(key))
    }
}

impl FromIterator<Box<dyn Loader>> for Loaders {
    fn from_iter<I: IntoIterator<Item = Box<dyn Loader>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Debug for Loaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Loaders")
            .field(&self.loaders)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_loaders_in_order() {
        let loaders = Loaders::default();
        let names: Vec<&str> = loaders.iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["CommandLine", "Environment", "EnvFile", "IniFile"]);
    }

    #[test]
    #[serial]
    fn test_first_loader_wins() {
        temp_env::with_vars([("FOO", Some("2"))], || {
            let loaders = Loaders::empty()
                .with(CommandLine::from_pairs([("FOO", "1")]))
                .with(Environment::new());
            assert_eq!(loaders.get_config("FOO", None).unwrap(), "1");
        });
    }

    #[test]
    #[serial]
    fn test_falls_through_to_later_loader() {
        temp_env::with_vars([("_CONFCHAIN_CHAIN_ONLY_ENV", Some("env"))], || {
            let loaders = Loaders::empty()
                .with(CommandLine::from_pairs([("OTHER", "cli")]))
                .with(Environment::new());
            assert_eq!(
                loaders.get_config("_CONFCHAIN_CHAIN_ONLY_ENV", None).unwrap(),
                "env"
            );
        });
    }

    #[test]
    fn test_exhausted_chain_is_not_found() {
        let loaders = Loaders::empty().with(CommandLine::from_pairs([("A", "1")]));
        let err = loaders.get_config("B", None).unwrap_err();
        assert!(err.is_not_found());

        assert!(Loaders::empty().get_config("B", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_hard_errors_stop_the_chain() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.env");
        fs::write(&path, "NOT VALID\n").unwrap();

        let loaders = Loaders::empty()
            .with(EnvFile::new().with_filename(&path))
            .with(CommandLine::from_pairs([("KEY", "fallback")]));

        assert!(matches!(
            loaders.get_config("KEY", None),
            Err(ConfigError::InvalidConfigurationFile { .. })
        ));
    }

    #[test]
    fn test_collect_from_boxed_loaders() {
        let loaders: Loaders = vec![
            Box::new(CommandLine::from_pairs([("A", "1")])) as Box<dyn Loader>,
            Box::new(IniFile::new()),
        ]
        .into_iter()
        .collect();
        assert_eq!(loaders.len(), 2);
        assert!(!loaders.is_empty());
    }
}
