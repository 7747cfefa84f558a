//! INI file loader.
//!
//! Responsibilities:
//! - Read one section of an INI file (default `setup.cfg`, section `settings`).
//! - Load lazily on first lookup and cache the section.
//!
//! Invariants:
//! - Option names are case-insensitive: the parser lower-cases them and the
//!   lookup lower-cases the formatted key.
//! - A missing file or missing section is "not found", not an error.
//! - Keys without a value resolve to an empty string.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::OnceCell;

use super::var_format::{self, VarFormat};
use super::{Loader, load_files};
use crate::constants::{DEFAULT_INI_FILE, DEFAULT_INI_SECTION};
use crate::error::ConfigError;
use crate::parser::IniParser;
use crate::source::{FileSource, Source, SourceKind};

/// Reads configuration from a section of an INI file.
pub struct IniFile {
    source: Box<dyn Source>,
    parser: IniParser,
    var_format: VarFormat,
    configs: OnceCell<HashMap<String, String>>,
}

impl Default for IniFile {
    fn default() -> Self {
        Self::new()
    }
}

impl IniFile {
    pub fn new() -> Self {
        Self {
            source: Box::new(FileSource::single(DEFAULT_INI_FILE)),
            parser: IniParser::new(DEFAULT_INI_SECTION),
            var_format: var_format::boxed(var_format::identity),
            configs: OnceCell::new(),
        }
    }

    pub fn with_filename(self, path: impl Into<PathBuf>) -> Self {
        self.with_source(FileSource::single(path))
    }

    pub fn with_source(mut self, source: impl Source + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.parser = IniParser::new(section);
        self
    }

    /// Replace the key normalization (default: identity).
    pub fn with_var_format<F>(mut self, format: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.var_format = var_format::boxed(format);
        self
    }

    pub fn section(&self) -> &str {
        self.parser.section()
    }

    fn bound_configs(&self) -> Result<&HashMap<String, String>, ConfigError> {
        self.configs.get_or_try_init(|| {
            let configs = load_files(self.source.as_ref(), &self.parser)?;
            tracing::debug!(
                source = ?self.source,
                section = %self.parser.section(),
                count = configs.len(),
                "Loaded INI configuration"
            );
            Ok(configs)
        })
    }
}

impl fmt::Debug for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IniFile")
            .field("source", &self.source)
            .field("section", &self.parser.section())
            .finish()
    }
}

impl Loader for IniFile {
    fn name(&self) -> &'static str {
        "IniFile"
    }

    fn accepts(&self, kind: SourceKind) -> bool {
        matches!(kind, SourceKind::Files | SourceKind::Search)
    }

    fn lookup(&self, key: &str, source: Option<&dyn Source>) -> Result<String, ConfigError> {
        let lookup_key = (self.var_format)(key).to_lowercase();
        let value = match source {
            Some(source) => load_files(source, &self.parser)?.remove(&lookup_key),
            None => self.bound_configs()?.get(&lookup_key).cloned(),
        };
        value.ok_or_else(|| ConfigError::not_found(key))
    }
}
