//! Sources of raw configuration text.
//!
//! Responsibilities:
//! - Define the `Source` trait: an ordered list of files plus a lazy stream reader.
//! - Provide `FileSource`, a static list of filenames.
//!
//! Does NOT handle:
//! - Parsing file contents (see `parser`).
//! - Walking directories to discover files (see `discovery`).
//!
//! Invariants:
//! - Streams are produced in filename order.
//! - Missing files are skipped silently; any other I/O failure is an error.
//! - A file is opened only when its stream is pulled, so a consumer that drops
//!   each stream before pulling the next never holds two files open.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The family a source belongs to, used by loaders to reject overrides
/// they cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// An explicit list of files.
    Files,
    /// Files discovered by walking up a directory tree.
    Search,
    /// Key/value pairs held by a remote store. No built-in loader reads these.
    Remote,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Files => "file list",
            SourceKind::Search => "file search",
            SourceKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// Where raw configuration text lives.
pub trait Source: fmt::Debug + Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Candidate files in precedence order. Entries may not exist.
    fn filenames(&self) -> Result<Vec<PathBuf>, ConfigError>;

    /// Open the existing candidates one at a time.
    fn streams(&self) -> Result<SourceStreams, ConfigError> {
        Ok(SourceStreams::new(self.filenames()?))
    }
}

/// One opened file, named by its path for error reporting.
pub struct SourceStream {
    path: PathBuf,
    reader: BufReader<File>,
}

impl SourceStream {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn reader(&mut self) -> &mut BufReader<File> {
        &mut self.reader
    }
}

impl fmt::Debug for SourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceStream")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Lazy iterator over the existing files of a source.
#[derive(Debug)]
pub struct SourceStreams {
    filenames: std::vec::IntoIter<PathBuf>,
}

impl SourceStreams {
    pub fn new(filenames: Vec<PathBuf>) -> Self {
        Self {
            filenames: filenames.into_iter(),
        }
    }
}

impl Iterator for SourceStreams {
    type Item = Result<SourceStream, ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        for path in self.filenames.by_ref() {
            match File::open(&path) {
                Ok(file) => {
                    return Some(Ok(SourceStream {
                        path,
                        reader: BufReader::new(file),
                    }));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::trace!(path = %path.display(), "Skipping missing configuration file");
                }
                Err(source) => return Some(Err(ConfigError::Io { path, source })),
            }
        }
        None
    }
}

/// A fixed, ordered list of files.
#[derive(Clone, PartialEq, Eq)]
pub struct FileSource {
    filenames: Vec<PathBuf>,
}

impl FileSource {
    pub fn new<I, P>(filenames: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    /// A source holding exactly one file.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            filenames: vec![path.into()],
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.filenames
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.filenames).finish()
    }
}

impl Source for FileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Files
    }

    fn filenames(&self) -> Result<Vec<PathBuf>, ConfigError> {
        Ok(self.filenames.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn read_all(stream: &mut SourceStream) -> String {
        let mut out = String::new();
        stream.reader().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.env");
        let missing = temp_dir.path().join("missing.env");
        let last = temp_dir.path().join("last.env");
        fs::write(&first, "A=1\n").unwrap();
        fs::write(&last, "B=2\n").unwrap();

        let source = FileSource::new([&first, &missing, &last]);
        let mut streams: Vec<SourceStream> = source
            .streams()
            .unwrap()
            .collect::<Result<_, _>>()
            .expect("missing file must not be an error");

        assert_eq!(streams.len(), 2);
        assert_eq!(streams[0].path(), first.as_path());
        assert_eq!(streams[1].path(), last.as_path());
        assert_eq!(read_all(&mut streams[0]), "A=1\n");
        assert_eq!(read_all(&mut streams[1]), "B=2\n");
    }

    #[test]
    fn test_all_missing_yields_nothing() {
        let source = FileSource::single("/definitely/not/here/.env");
        assert_eq!(source.streams().unwrap().count(), 0);
    }

    #[test]
    fn test_filenames_preserve_order() {
        let source = FileSource::new(["b", "a", "c"]);
        assert_eq!(
            source.filenames().unwrap(),
            vec![PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("c")]
        );
        assert_eq!(source.kind(), SourceKind::Files);
    }

    #[test]
    fn test_debug_lists_filenames() {
        let source = FileSource::new([".env", "local.env"]);
        assert_eq!(format!("{:?}", source), r#"[".env", "local.env"]"#);
    }
}
