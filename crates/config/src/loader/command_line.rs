//! Command-line argument loader.
//!
//! Responsibilities:
//! - Parse process (or explicit) arguments once, at construction.
//! - Expand the `--config KEY=value` group into individual keys.
//! - Adopt any other argument the user actually passed, keyed by its clap id.
//!
//! Does NOT handle:
//! - Printing help or version output; the default command disables both.
//!
//! Invariants:
//! - Only values whose clap `ValueSource` is the command line or an environment
//!   variable are kept. Values clap filled in from `default_value` count as
//!   "not set", so they never shadow later loaders in the chain.
//! - Keys are looked up verbatim (no `var_format`).

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::Loader;
use crate::constants::{CONFIG_ARG_ID, CONFIG_ARG_VALUE_NAME, DEFAULT_LIST_DELIMITER};
use crate::error::ConfigError;
use crate::source::Source;

/// Values passed on the command line.
pub struct CommandLine {
    configs: HashMap<String, String>,
}

impl Default for CommandLine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLine {
    /// Parse the process arguments with [`CommandLine::default_command`].
    ///
    /// Unknown arguments are ignored, so this is safe to call from any binary.
    pub fn new() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Parse `args` (program name first) with [`CommandLine::default_command`].
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::with_command(Self::default_command(), args) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparsable command line");
                Self::from_pairs(std::iter::empty::<(String, String)>())
            }
        }
    }

    /// Parse `args` with a caller-built command.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CommandLine` if clap rejects the arguments.
    pub fn with_command<I, T>(command: Command, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = command.try_get_matches_from(args)?;
        Ok(Self::from_matches(&matches))
    }

    /// Adopt the values of an already-parsed argument set.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let mut configs = HashMap::new();

        for id in matches.ids() {
            let id = id.as_str();
            if !matches!(
                matches.value_source(id),
                Some(ValueSource::CommandLine | ValueSource::EnvVariable)
            ) {
                continue;
            }
            let Ok(Some(raw)) = matches.try_get_raw(id) else {
                continue;
            };
            let values: Vec<String> = raw.map(|v| v.to_string_lossy().into_owned()).collect();

            if id == CONFIG_ARG_ID {
                for token in values {
                    match token.split_once('=') {
                        Some((key, value)) if !key.trim().is_empty() => {
                            configs.insert(key.trim().to_string(), value.to_string());
                        }
                        _ => tracing::warn!(
                            "Skipping --{} value without KEY=value form",
                            CONFIG_ARG_ID
                        ),
                    }
                }
            } else {
                configs.insert(
                    id.to_string(),
                    values.join(&DEFAULT_LIST_DELIMITER.to_string()),
                );
            }
        }

        tracing::debug!(count = configs.len(), "Loaded command line configuration");
        Self { configs }
    }

    /// Build a loader from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            configs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The command used when no parser is supplied: a repeatable
    /// `--config KEY=value ...` flag that tolerates unrelated arguments.
    pub fn default_command() -> Command {
        Command::new("confchain")
            .disable_help_flag(true)
            .disable_version_flag(true)
            .ignore_errors(true)
            .arg(
                Arg::new(CONFIG_ARG_ID)
                    .long(CONFIG_ARG_ID)
                    .value_name(CONFIG_ARG_VALUE_NAME)
                    .num_args(0..)
                    .action(ArgAction::Append),
            )
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl fmt::Debug for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // values may be secrets; keys only
        let mut keys: Vec<&String> = self.configs.keys().collect();
        keys.sort();
        f.debug_struct("CommandLine").field("keys", &keys).finish()
    }
}

impl Loader for CommandLine {
    fn name(&self) -> &'static str {
        "CommandLine"
    }

    fn lookup(&self, key: &str, _source: Option<&dyn Source>) -> Result<String, ConfigError> {
        self.configs
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::not_found(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_group_is_split_into_keys() {
        let loader = CommandLine::from_args([
            "app",
            "--config",
            "FOO=1",
            "BAR=a=b",
            "--config",
            "EMPTY=",
        ]);

        assert_eq!(loader.lookup("FOO", None).unwrap(), "1");
        assert_eq!(loader.lookup("BAR", None).unwrap(), "a=b");
        assert_eq!(loader.lookup("EMPTY", None).unwrap(), "");
        assert!(loader.lookup("foo", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        let loader = CommandLine::from_args(["app", "--config", "NOEQUALS", "=value", "OK=1"]);
        assert_eq!(loader.len(), 1);
        assert_eq!(loader.lookup("OK", None).unwrap(), "1");
    }

    #[test]
    fn test_no_arguments_means_nothing_set() {
        let loader = CommandLine::from_args(["app"]);
        assert!(loader.is_empty());
        assert!(loader.lookup("config", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_defaults_are_not_set() {
        let command = Command::new("app")
            .arg(Arg::new("level").long("level").default_value("info"))
            .arg(Arg::new("port").long("port"));

        let loader = CommandLine::with_command(command, ["app", "--port", "8080"]).unwrap();

        assert_eq!(loader.lookup("port", None).unwrap(), "8080");
        assert!(
            loader.lookup("level", None).unwrap_err().is_not_found(),
            "a clap default must not shadow later loaders"
        );
    }

    #[test]
    fn test_explicit_empty_value_is_set() {
        let command = Command::new("app").arg(Arg::new("name").long("name").default_value("x"));
        let loader = CommandLine::with_command(command, ["app", "--name", ""]).unwrap();
        assert_eq!(loader.lookup("name", None).unwrap(), "");
    }

    #[test]
    fn test_custom_command_errors_propagate() {
        let command = Command::new("app").arg(Arg::new("port").long("port").required(true));
        let result = CommandLine::with_command(command, ["app"]);
        assert!(matches!(result, Err(ConfigError::CommandLine(_))));
    }

    #[test]
    fn test_debug_hides_values() {
        let loader = CommandLine::from_pairs([("TOKEN", "hunter2")]);
        let debug = format!("{:?}", loader);
        assert!(debug.contains("TOKEN"));
        assert!(!debug.contains("hunter2"));
    }
}
