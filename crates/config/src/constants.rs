//! Centralized constants for the confchain workspace.
//!
//! This module contains default values used across crates to avoid
//! duplicating file names and flag ids in loaders, tests, and the CLI.

// =============================================================================
// File Defaults
// =============================================================================

/// Default env-file read by `EnvFile::new()`.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default INI file read by `IniFile::new()`.
pub const DEFAULT_INI_FILE: &str = "setup.cfg";

/// Default INI section consulted by `IniFile::new()`.
pub const DEFAULT_INI_SECTION: &str = "settings";

/// INI section whose values are inherited by every other section.
pub const INI_DEFAULT_SECTION: &str = "DEFAULT";

// =============================================================================
// Discovery Defaults
// =============================================================================

/// Default upper boundary for recursive file search.
pub const DEFAULT_ROOT_PATH: &str = "/";

/// Patterns the default discovery looks for when hunting env files.
pub const ENV_FILE_PATTERNS: &[&str] = &[".env"];

/// Patterns the default discovery looks for when hunting INI files.
pub const INI_FILE_PATTERNS: &[&str] = &["*.ini", "*.cfg"];

// =============================================================================
// Command Line Defaults
// =============================================================================

/// Argument id (and long flag) of the default `--config KEY=value` group.
pub const CONFIG_ARG_ID: &str = "config";

/// Value placeholder shown in help output for `--config`.
pub const CONFIG_ARG_VALUE_NAME: &str = "CONFIG=value";

// =============================================================================
// Cast Defaults
// =============================================================================

/// Default delimiter for list and tuple casts.
pub const DEFAULT_LIST_DELIMITER: char = ',';

/// Quote characters recognized by list and tuple casts.
pub const LIST_QUOTES: &[char] = &['"', '\''];
