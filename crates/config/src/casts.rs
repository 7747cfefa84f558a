//! Standard casts from raw configuration strings to typed values.
//!
//! Responsibilities:
//! - Define the `Cast` trait; any `Fn(&str) -> Result<T, CastError>` is a cast.
//! - Provide boolean, parsed, list, tuple, choice, JSON, and literal casts.
//!
//! Does NOT handle:
//! - Attaching the key to failures (the resolver wraps `CastError` into
//!   `ConfigError::InvalidValue`).
//!
//! Invariants:
//! - Casts are pure: same input, same output, no I/O.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::constants::{DEFAULT_LIST_DELIMITER, LIST_QUOTES};
use crate::error::CastError;

/// Converts a raw configuration string into `T`.
pub trait Cast<T> {
    fn cast(&self, raw: &str) -> Result<T, CastError>;
}

impl<T, F> Cast<T> for F
where
    F: Fn(&str) -> Result<T, CastError>,
{
    fn cast(&self, raw: &str) -> Result<T, CastError> {
        self(raw)
    }
}

/// Identity cast.
pub fn raw(value: &str) -> Result<String, CastError> {
    Ok(value.to_string())
}

/// Case-insensitive boolean tokens: `1/true/t/yes/y/on` and `0/false/f/no/n/off`.
pub fn boolean(value: &str) -> Result<bool, CastError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(CastError::new(format!("Invalid boolean value '{}'", value))),
    }
}

/// Parse with `FromStr`, e.g. `parsed::<u16>`.
pub fn parsed<T>(value: &str) -> Result<T, CastError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        CastError::new(format!(
            "Cannot parse '{}' as {}: {}",
            value,
            std::any::type_name::<T>(),
            e
        ))
    })
}

/// Decode JSON into any deserializable type.
pub fn json<T: DeserializeOwned>(value: &str) -> Result<T, CastError> {
    serde_json::from_str(value).map_err(|e| CastError::new(format!("Invalid JSON: {}", e)))
}

/// Evaluate a literal: integers, floats, booleans, quoted strings, arrays,
/// and inline tables.
pub fn eval(value: &str) -> Result<toml::Value, CastError> {
    let invalid = || CastError::new(format!("Invalid literal '{}'", value));
    if value.contains('\n') {
        return Err(invalid());
    }

    let mut table: toml::Table =
        toml::from_str(&format!("value = {}", value.trim())).map_err(|_| invalid())?;
    if table.len() != 1 {
        return Err(invalid());
    }
    table.remove("value").ok_or_else(invalid)
}

/// `[a, b, "c, d"]` style lists.
pub fn list(value: &str) -> Result<Vec<String>, CastError> {
    List::default().cast(value)
}

/// `(a, b)` style tuples of any arity.
pub fn tuple(value: &str) -> Result<Vec<String>, CastError> {
    Tuple::default().cast(value)
}

/// Delimited list with optional surrounding brackets and quoted items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct List {
    delimiter: char,
}

impl Default for List {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_LIST_DELIMITER,
        }
    }
}

impl List {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Cast<Vec<String>> for List {
    fn cast(&self, raw: &str) -> Result<Vec<String>, CastError> {
        split_items(raw, ('[', ']'), self.delimiter)
    }
}

/// Like [`List`], with parentheses and an optional fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple {
    delimiter: char,
    arity: Option<usize>,
}

impl Default for Tuple {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_LIST_DELIMITER,
            arity: None,
        }
    }
}

impl Tuple {
    /// Require exactly `arity` items.
    pub fn of(arity: usize) -> Self {
        Self {
            arity: Some(arity),
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Cast<Vec<String>> for Tuple {
    fn cast(&self, raw: &str) -> Result<Vec<String>, CastError> {
        let items = split_items(raw, ('(', ')'), self.delimiter)?;
        match self.arity {
            Some(expected) if items.len() != expected => Err(CastError::new(format!(
                "Expected {} items, got {}",
                expected,
                items.len()
            ))),
            _ => Ok(items),
        }
    }
}

/// A closed set of accepted values, each mapped to a typed option.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    options: Vec<(String, T)>,
}

impl<T: Clone> Choice<T> {
    pub fn new<I, K>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
    {
        Self {
            options: options.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<T: Clone> Cast<T> for Choice<T> {
    fn cast(&self, raw: &str) -> Result<T, CastError> {
        self.options
            .iter()
            .find(|(name, _)| name == raw)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| {
                let names: Vec<&str> = self.options.iter().map(|(n, _)| n.as_str()).collect();
                CastError::new(format!(
                    "Invalid option '{}'; expected one of: {}",
                    raw,
                    names.join(", ")
                ))
            })
    }
}

fn split_items(raw: &str, brackets: (char, char), delimiter: char) -> Result<Vec<String>, CastError> {
    let mut value = raw.trim();
    if let Some(inner) = value
        .strip_prefix(brackets.0)
        .and_then(|rest| rest.strip_suffix(brackets.1))
    {
        value = inner.trim();
    }
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in value.chars() {
        match quote {
            Some(open) if ch == open => {
                quote = None;
                current.push(ch);
            }
            Some(_) => current.push(ch),
            None if LIST_QUOTES.contains(&ch) => {
                quote = Some(ch);
                current.push(ch);
            }
            None if ch == delimiter => items.push(std::mem::take(&mut current)),
            None => current.push(ch),
        }
    }
    if quote.is_some() {
        return Err(CastError::new(format!("Unclosed quote in '{}'", raw)));
    }
    items.push(current);

    // a single trailing delimiter does not add an empty item
    if items.len() > 1 && items.last().is_some_and(|s| s.trim().is_empty()) {
        items.pop();
    }

    Ok(items.iter().map(|item| unquote(item.trim()).to_string()).collect())
}

fn unquote(item: &str) -> &str {
    for &q in LIST_QUOTES {
        if let Some(inner) = item.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)) {
            return inner;
        }
    }
    item
}
