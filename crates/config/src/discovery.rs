//! Recursive file discovery.
//!
//! Responsibilities:
//! - Locate configuration files by walking from a start directory up to a root.
//! - Expand glob patterns against each directory level.
//! - Expose the discovered files as a `Source`.
//!
//! Does NOT handle:
//! - Reading or parsing the discovered files (see `source` and `parser`).
//! - Inferring a start directory from the caller; callers pass it explicitly.
//!
//! Invariants:
//! - The start path is canonical, exists, and lies under the canonical root.
//! - A walk visits start, its parents, and stops after visiting root.
//! - Patterns are relative to each visited directory; absolute patterns and
//!   patterns containing `..` are rejected.
//! - Patterns are de-duplicated keeping their first occurrence, so matches
//!   within one directory follow the caller's pattern order.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::constants::DEFAULT_ROOT_PATH;
use crate::error::ConfigError;
use crate::source::{FileSource, Source, SourceKind};

/// A source whose files are found by searching upward from `start_path`.
#[derive(Debug, Clone)]
pub struct RecursiveFileSearchSource {
    patterns: Vec<String>,
    start_path: PathBuf,
    root_path: PathBuf,
}

impl RecursiveFileSearchSource {
    /// Search from `start_path` up to the filesystem root.
    pub fn new<I, S>(patterns: I, start_path: impl AsRef<Path>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_root(patterns, start_path, DEFAULT_ROOT_PATH)
    }

    /// Search from `start_path` up to and including `root_path`.
    pub fn with_root<I, S>(
        patterns: I,
        start_path: impl AsRef<Path>,
        root_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root_path.as_ref();
        let root_path = std::fs::canonicalize(root).map_err(|_| ConfigError::InvalidPath {
            path: root.to_path_buf(),
            reason: "root path does not exist".to_string(),
        })?;

        let mut source = Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            start_path: root_path.clone(),
            root_path,
        };
        source.set_start_path(start_path)?;
        Ok(source)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn start_path(&self) -> &Path {
        &self.start_path
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Move the search start. A file path is replaced by its directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPath` if the path is empty, does not exist,
    /// or does not lie under the root path.
    pub fn set_start_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let invalid = |reason: &str| ConfigError::InvalidPath {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if path.as_os_str().is_empty() {
            return Err(invalid("starting path is empty"));
        }

        let resolved = std::fs::canonicalize(path)
            .map_err(|_| invalid("starting path does not exist"))?;
        if !resolved.starts_with(&self.root_path) {
            return Err(invalid("starting path is outside the root path"));
        }

        self.start_path = if resolved.is_dir() {
            resolved
        } else {
            // canonical file paths always have a parent
            resolved.parent().map(Path::to_path_buf).unwrap_or(resolved)
        };
        Ok(())
    }

    /// Lazily yield every file matching `patterns`, nearest directory first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if any pattern is not a valid glob,
    /// or if it could match outside the directory it is applied to (absolute
    /// patterns and patterns containing `..`).
    pub fn find_all<I, S>(&self, patterns: I) -> Result<FindAll, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            validate_pattern(pattern)?;
            if seen.insert(pattern.to_string()) {
                unique.push(pattern.to_string());
            }
        }

        Ok(FindAll {
            patterns: unique,
            root_path: self.root_path.clone(),
            next_dir: Some(self.start_path.clone()),
            pending: Vec::new().into_iter(),
        })
    }

    /// Return the nearest file matching `patterns`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` when the walk finds nothing.
    pub fn find_first<I, S>(&self, patterns: I) -> Result<PathBuf, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        self.find_all(&patterns)?
            .next()
            .ok_or(ConfigError::FileNotFound { patterns })
    }

    /// Freeze the current discovery result into a static file list.
    pub fn to_file_source(&self) -> Result<FileSource, ConfigError> {
        Ok(FileSource::new(self.filenames()?))
    }
}

impl Source for RecursiveFileSearchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Search
    }

    /// Matches ordered farthest directory first, so that when loaders merge
    /// streams with last-write-wins the nearest file takes precedence.
    fn filenames(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut found: Vec<PathBuf> = self.find_all(&self.patterns)?.collect();
        found.reverse();
        Ok(found)
    }
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    let reject = |message: &str| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    glob::Pattern::new(pattern).map_err(|e| reject(e.msg))?;

    let escapes = Path::new(pattern).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(reject("pattern must stay within the searched directory"));
    }
    Ok(())
}

/// Iterator returned by [`RecursiveFileSearchSource::find_all`].
#[derive(Debug)]
pub struct FindAll {
    patterns: Vec<String>,
    root_path: PathBuf,
    next_dir: Option<PathBuf>,
    pending: std::vec::IntoIter<PathBuf>,
}

impl FindAll {
    fn scan_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        let base = Path::new(&escaped);
        let mut found = Vec::new();

        for pattern in &self.patterns {
            let full = base.join(pattern);
            let paths = match glob::glob(&full.to_string_lossy()) {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Skipping unusable glob pattern");
                    continue;
                }
            };
            for entry in paths {
                match entry {
                    Ok(path) => found.push(path),
                    Err(e) => tracing::warn!("Error reading glob entry: {}", e),
                }
            }
        }

        found
    }
}

impl Iterator for FindAll {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            if let Some(path) = self.pending.next() {
                return Some(path);
            }

            let dir = self.next_dir.take()?;
            if dir != self.root_path {
                self.next_dir = dir.parent().map(Path::to_path_buf);
            }
            self.pending = self.scan_dir(&dir).into_iter();
        }
    }
}
