//! Find command implementation.

use anyhow::{Context, Result};
use confchain::RecursiveFileSearchSource;
use std::path::Path;

pub fn run(patterns: &[String], start: &Path, root: &Path, all: bool) -> Result<()> {
    let search = RecursiveFileSearchSource::with_root(patterns, start, root)
        .with_context(|| format!("Failed to search from {}", start.display()))?;

    if all {
        let mut count = 0usize;
        for path in search.find_all(patterns)? {
            println!("{}", path.display());
            count += 1;
        }
        tracing::debug!(count, "Listed matching files");
    } else {
        let path = search.find_first(patterns)?;
        println!("{}", path.display());
    }

    Ok(())
}
