//! File format parsers used by the file-backed loaders.
//!
//! Responsibilities:
//! - Define the `FileParser` contract: a readable stream in, a key/value map out.
//! - Parse env files (`KEY=value`) through `dotenvy`, keeping values literal.
//! - Parse one section of an INI file, including valueless keys.
//!
//! Does NOT handle:
//! - Opening files or skipping missing ones (see `source`).
//! - Key normalization (each loader applies its own `var_format`).
//! - `$VAR` expansion in env files or `%(name)s` interpolation in INI files.
//!
//! Invariants:
//! - Syntax errors report a line number only; line contents never leave the parser.
//! - Content that is not valid UTF-8 is a syntax error on the line where
//!   decoding fails, never an I/O error.
//! - INI option names are lower-cased; values are trimmed.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{BufRead, ErrorKind};

use thiserror::Error;

use crate::constants::{DEFAULT_INI_SECTION, INI_DEFAULT_SECTION};

/// Failure to turn a stream into key/value pairs.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("syntax error at line {line}")]
    Syntax { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Turns one readable stream into a flat key/value mapping.
pub trait FileParser: fmt::Debug + Send + Sync {
    fn parse(&self, reader: &mut dyn BufRead) -> Result<HashMap<String, String>, ParseError>;
}

/// Env-file parser backed by `dotenvy`.
///
/// Supports `KEY=value`, `export KEY=value`, quoting, escapes and comments as
/// `dotenvy` reads them. Values are literal: a `$` is kept as written and
/// never expanded from earlier lines or from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotenvParser;

impl FileParser for DotenvParser {
    fn parse(&self, reader: &mut dyn BufRead) -> Result<HashMap<String, String>, ParseError> {
        let content = read_utf8(reader)?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let escaped = escape_substitutions(content);
        let mut lines = LineTracker::new(&escaped);

        let mut values = HashMap::new();
        for item in dotenvy::from_read_iter(escaped.as_bytes()) {
            match item {
                Ok((key, value)) => {
                    lines.advance_past(&key);
                    values.insert(key, value);
                }
                Err(dotenvy::Error::Io(e)) => return Err(ParseError::Io(e)),
                Err(dotenvy::Error::LineParse(text, _)) => {
                    return Err(ParseError::Syntax {
                        line: lines.locate(&text),
                    });
                }
                Err(_) => {
                    return Err(ParseError::Syntax {
                        line: lines.last(),
                    });
                }
            }
        }
        Ok(values)
    }
}

/// Read the whole stream as UTF-8.
fn read_utf8(reader: &mut dyn BufRead) -> Result<String, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        ParseError::Syntax {
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
        }
    })
}

/// Escape every `$` that `dotenvy` would expand.
///
/// Quoting is tracked the way `dotenvy` reads values: single-quoted text is
/// literal, a backslash outside single quotes escapes the next character, and
/// an unquoted `#` at the start of a line or after whitespace opens a comment
/// that runs to the end of the line.
fn escape_substitutions(content: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Plain,
        Single,
        Double,
        Comment,
    }

    let mut escaped = String::with_capacity(content.len());
    let mut state = State::Plain;
    let mut after_blank = true;
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        match (state, c) {
            (State::Comment, '\n') => state = State::Plain,
            (State::Comment, _) => {}
            (State::Single, '\'') => state = State::Plain,
            (State::Single, _) => {}
            (_, '\\') => {
                escaped.push(c);
                let next = chars.next();
                if let Some(next) = next {
                    escaped.push(next);
                }
                after_blank = next == Some('\n');
                continue;
            }
            (_, '$') => escaped.push('\\'),
            (State::Double, '"') => state = State::Plain,
            (State::Double, _) => {}
            (State::Plain, '"') => state = State::Double,
            (State::Plain, '\'') => state = State::Single,
            (State::Plain, '#') if after_blank => state = State::Comment,
            (State::Plain, _) => {}
        }
        escaped.push(c);
        after_blank = c.is_whitespace();
    }
    escaped
}

/// Maps the text `dotenvy` reports for a failure back to a 1-based line.
///
/// Parsed entries move a cursor past the line that defines them, so a failure
/// is only searched for among the lines after the last good entry.
struct LineTracker<'a> {
    lines: Vec<&'a str>,
    next: usize,
}

impl<'a> LineTracker<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().collect(),
            next: 0,
        }
    }

    fn advance_past(&mut self, key: &str) {
        if let Some(offset) = self.lines[self.next..]
            .iter()
            .position(|line| defines_key(line, key))
        {
            self.next += offset + 1;
        }
    }

    /// `text` is either the whole logical line or just its value.
    fn locate(&self, text: &str) -> usize {
        let first = text.lines().next().unwrap_or_default().trim();
        let rest = &self.lines[self.next..];

        let whole_line = rest.iter().position(|line| line.trim() == first);
        let partial = || {
            if first.is_empty() {
                None
            } else {
                rest.iter().position(|line| line.contains(first))
            }
        };
        match whole_line.or_else(partial) {
            Some(offset) => self.next + offset + 1,
            None => self.last(),
        }
    }

    fn last(&self) -> usize {
        self.lines.len().max(1)
    }
}

fn defines_key(line: &str, key: &str) -> bool {
    let line = line.trim_start();
    let line = line
        .strip_prefix("export")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map_or(line, str::trim_start);
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

/// INI parser returning a single section merged over `[DEFAULT]`.
///
/// Follows the common configparser dialect: `key = value` or `key: value`,
/// `#` and `;` comment lines, indented continuation lines, and keys without
/// a value (which map to an empty string).
///
/// Differences from configparser:
/// - A blank line ends a multi-line value; indented lines after it are parsed
///   as new options.
/// - Section names are taken literally: case and surrounding spaces inside the
///   brackets are kept, and an empty header (`[]`) is a syntax error.
/// - Values are never interpolated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniParser {
    section: String,
}

impl Default for IniParser {
    fn default() -> Self {
        Self::new(DEFAULT_INI_SECTION)
    }
}

impl IniParser {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }
}

impl FileParser for IniParser {
    fn parse(&self, reader: &mut dyn BufRead) -> Result<HashMap<String, String>, ParseError> {
        let mut document = parse_document(reader)?;

        let Some(section) = document.remove(&self.section) else {
            return Ok(HashMap::new());
        };
        let mut values = document.remove(INI_DEFAULT_SECTION).unwrap_or_default();
        values.extend(section);
        Ok(values)
    }
}

type Document = HashMap<String, HashMap<String, String>>;

fn parse_document(reader: &mut dyn BufRead) -> Result<Document, ParseError> {
    let mut document = Document::new();
    let mut seen_sections = HashSet::new();
    let mut section: Option<String> = None;
    // (key, accepts continuation lines)
    let mut last_option: Option<(String, bool)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => ParseError::Syntax { line: line_no },
            _ => ParseError::Io(e),
        })?;
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.is_empty() {
            last_option = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if indented {
            if let (Some(name), Some((key, true))) = (&section, &last_option) {
                if let Some(value) = document.get_mut(name).and_then(|s| s.get_mut(key)) {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
        }

        if let Some(name) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            if name.is_empty() || !seen_sections.insert(name.to_string()) {
                return Err(ParseError::Syntax { line: line_no });
            }
            document.entry(name.to_string()).or_default();
            section = Some(name.to_string());
            last_option = None;
            continue;
        }

        let Some(name) = &section else {
            return Err(ParseError::Syntax { line: line_no });
        };

        let (key, value, has_value) = match trimmed.find(['=', ':']) {
            Some(pos) => (&trimmed[..pos], trimmed[pos + 1..].trim(), true),
            None => (trimmed, "", false),
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(ParseError::Syntax { line: line_no });
        }

        let options = document.entry(name.clone()).or_default();
        if options.contains_key(&key) {
            return Err(ParseError::Syntax { line: line_no });
        }
        options.insert(key.clone(), value.to_string());
        last_option = Some((key, has_value));
    }

    Ok(document)
}
