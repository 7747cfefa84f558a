//! Env-file (`KEY=value`) loader.
//!
//! Responsibilities:
//! - Read every stream of a bound `Source` through a `FileParser` on first lookup.
//! - Merge the parsed values, later streams overriding earlier ones.
//!
//! Does NOT handle:
//! - Exporting values into the process environment; values stay in the loader.
//!
//! Invariants:
//! - The bound source is loaded once; edits made afterwards are not seen.
//! - A source override is read on demand for that lookup only and never cached.
//! - A parse failure is fatal for the load and names the offending file.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::OnceCell;

use super::var_format::{self, VarFormat};
use super::{Loader, load_files};
use crate::constants::DEFAULT_ENV_FILE;
use crate::error::ConfigError;
use crate::parser::{DotenvParser, FileParser};
use crate::source::{FileSource, Source, SourceKind};

/// Reads configuration from env files.
pub struct EnvFile {
    source: Box<dyn Source>,
    parser: Box<dyn FileParser>,
    var_format: VarFormat,
    configs: OnceCell<HashMap<String, String>>,
}

impl Default for EnvFile {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvFile {
    /// Read `.env` from the current directory.
    pub fn new() -> Self {
        Self {
            source: Box::new(FileSource::single(DEFAULT_ENV_FILE)),
            parser: Box::new(DotenvParser),
            var_format: var_format::boxed(var_format::upper),
            configs: OnceCell::new(),
        }
    }

    /// Read a single env file.
    pub fn with_filename(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(FileSource::single(path))
    }

    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_parser(mut self, parser: impl FileParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replace the key normalization (default: upper-case).
    pub fn with_var_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.var_format = var_format::boxed(format);
        self
    }

    fn bound_configs(&self) -> Result<&HashMap<String, String>, ConfigError> {
        self.configs.get_or_try_init(|| {
            let configs = load_files(self.source.as_ref(), self.parser.as_ref())?;
            tracing::debug!(source = ?self.source, count = configs.len(), "Loaded env file configuration");
            Ok(configs)
        })
    }
}

impl fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnvFile").field(&self.source).finish()
    }
}

impl Loader for EnvFile {
    fn name(&self) -> &'static str {
        "EnvFile"
    }

    fn accepts(&self, kind: SourceKind) -> bool {
        matches!(kind, SourceKind::Files | SourceKind::Search)
    }

    fn lookup(&self, key: &str, source: Option<&dyn Source>) -> Result<String, ConfigError> {
        let lookup_key = (self.var_format)(key);
        let value = match source {
            Some(source) => load_files(source, self.parser.as_ref())?.remove(&lookup_key),
            None => self.bound_configs()?.get(&lookup_key).cloned(),
        };
        value.ok_or_else(|| ConfigError::not_found(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_and_normalizes_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".env");
        fs::write(&path, "DATABASE_URL=postgres://localhost/app\n").unwrap();

        let loader = EnvFile::new().with_filename(&path);
        assert_eq!(
            loader.lookup("database_url", None).unwrap(),
            "postgres://localhost/app"
        );
    }

    #[test]
    fn test_later_files_override_earlier() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("base.env");
        let local = temp_dir.path().join("local.env");
        fs::write(&base, "HOST=base\nPORT=80\n").unwrap();
        fs::write(&local, "HOST=local\n").unwrap();

        let loader = EnvFile::new().with_source(FileSource::new([&base, &local]));
        assert_eq!(loader.lookup("HOST", None).unwrap(), "local");
        assert_eq!(loader.lookup("PORT", None).unwrap(), "80");
    }

    #[test]
    fn test_missing_file_means_not_found() {
        let loader = EnvFile::new().with_filename("/definitely/not/here/.env");
        assert!(loader.lookup("ANY", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_file_names_the_stream() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.env");
        fs::write(&path, "OK=1\nTHIS_LINE_IS_BROKEN\n").unwrap();

        let loader = EnvFile::new().with_filename(&path);
        match loader.lookup("OK", None) {
            Err(ConfigError::InvalidConfigurationFile { path: failed, line }) => {
                assert_eq!(failed, path);
                assert_eq!(line, 2);
            }
            other => panic!("expected InvalidConfigurationFile, got {:?}", other),
        }
    }

    #[test]
    fn test_override_is_read_without_touching_cache() {
        let temp_dir = TempDir::new().unwrap();
        let bound = temp_dir.path().join("bound.env");
        let other = temp_dir.path().join("other.env");
        fs::write(&bound, "NAME=bound\n").unwrap();
        fs::write(&other, "NAME=other\n").unwrap();

        let loader = EnvFile::new().with_filename(&bound);
        let override_source = FileSource::single(&other);

        assert_eq!(
            loader.lookup("NAME", Some(&override_source)).unwrap(),
            "other"
        );
        assert_eq!(loader.lookup("NAME", None).unwrap(), "bound");
    }

    #[test]
    fn test_remote_override_is_rejected() {
        #[derive(Debug)]
        struct Remote;
        impl Source for Remote {
            fn kind(&self) -> SourceKind {
                SourceKind::Remote
            }
            fn filenames(&self) -> Result<Vec<PathBuf>, ConfigError> {
                Ok(Vec::new())
            }
        }

        let loader = EnvFile::new();
        match loader.get_config("KEY", Some(&Remote)) {
            Err(ConfigError::SourceMismatch { loader, found }) => {
                assert_eq!(loader, "EnvFile");
                assert_eq!(found, SourceKind::Remote);
            }
            other => panic!("expected SourceMismatch, got {:?}", other),
        }
    }
}
