//! Shared test utilities for confchain integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory rooted in a scratch directory.
//!
//! Invariants / Assumptions:
//! - Every command runs in its own temporary working directory, so the default
//!   `.env` and `setup.cfg` lookups never see files from the host checkout.
//! - Test keys use the `_CC_` prefix to stay clear of real host variables.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch working directory for one CLI invocation.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Canonical path of the workspace root.
    pub fn path(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("canonicalize temp dir")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    /// Returns a hermetic `confchain` command running in this workspace.
    pub fn cmd(&self) -> Command {
        confchain_cmd(&self.path())
    }
}

/// Returns a `confchain` command running in `dir` with logging silenced.
pub fn confchain_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confchain");
    cmd.current_dir(dir);

    // Keep stderr free of host log settings
    cmd.env_remove("RUST_LOG");

    cmd
}
