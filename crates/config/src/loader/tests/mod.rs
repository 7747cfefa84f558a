//! Cross-loader tests.
//!
//! Responsibilities:
//! - Test load-once caching against files edited after the first lookup.
//! - Test file loaders fed by recursive discovery.
//! - Test source override validation across the loader family.
//! - Test the env file dialect and its error reporting end to end.
//!
//! Does NOT handle:
//! - Per-loader parsing details (tested next to each loader).
//!
//! Invariants:
//! - Tests that touch the process environment use `serial_test`.
//! - Temporary directories are cleaned up automatically via `tempfile`.
