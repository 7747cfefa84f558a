//! Exit code contract tests.
//!
//! Scripts branch on these codes, so each category is pinned here:
//! 0 success, 4 not found, 5 validation.

mod common;

use common::Workspace;
use predicates::prelude::*;

#[test]
fn test_success_exits_zero() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["get", "_CC_OK", "--config", "_CC_OK=1"])
        .assert()
        .code(0);
}

#[test]
fn test_unknown_key_exits_four() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["get", "_CC_MISSING_EVERYWHERE", "--no-env"])
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Configuration '_CC_MISSING_EVERYWHERE' not found",
        ));
}

#[test]
fn test_bad_cast_exits_five() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["get", "_CC_PORT", "--cast", "int", "--config", "_CC_PORT=http"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid value for _CC_PORT"));
}

#[test]
fn test_malformed_env_file_exits_five_without_leaking_content() {
    let ws = Workspace::new();
    ws.write(".env", "_CC_OK=1\nSECRET hunter2\n");

    ws.cmd()
        .args(["get", "_CC_OK"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("hunter2").not());
}

#[test]
fn test_invalid_pattern_exits_five() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["find", "[unclosed"])
        .arg("--root")
        .arg(ws.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_parent_dir_pattern_exits_five() {
    let ws = Workspace::new();
    ws.write("secret.env", "_CC_TOKEN=1\n");
    ws.write("inside/marker", "");

    ws.cmd()
        .args(["find", "../secret.env"])
        .arg("--start")
        .arg(ws.path().join("inside"))
        .arg("--root")
        .arg(ws.path().join("inside"))
        .assert()
        .code(5)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn test_non_utf8_env_file_exits_five() {
    let ws = Workspace::new();
    let path = ws.write(".env", "");
    std::fs::write(&path, b"_CC_OK=1\n_CC_BAD=\xff\xfe\n").unwrap();

    ws.cmd()
        .args(["get", "_CC_OK"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_usage_error_exits_two() {
    // clap reports usage errors itself with its own exit code
    let ws = Workspace::new();
    ws.cmd().args(["get"]).assert().code(2);
}
