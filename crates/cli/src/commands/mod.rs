//! CLI command implementations.

pub mod find;
pub mod get;
pub mod loaders;
