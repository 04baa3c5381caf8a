//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Reference date every test runs at
pub const TODAY: &str = "2025-06-15";

/// Helper to get a minv command with a fixed date and author
pub fn minv() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("minv"));
    cmd.env("MINV_TODAY", TODAY)
        .env("MINV_AUTHOR", "tester")
        .env_remove("MINV_ROLE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to run minv inside a project directory
pub fn minv_in(dir: &Path) -> Command {
    let mut cmd = minv();
    // Keep the user's global config out of the tests
    cmd.current_dir(dir).env("XDG_CONFIG_HOME", dir.join(".xdg"));
    cmd
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    minv_in(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a test product, returning its full ID
pub fn create_test_product(tmp: &TempDir, name: &str, sku: &str, extra: &[&str]) -> String {
    let output = minv_in(tmp.path())
        .args(["product", "new", "--name", name, "--sku", sku, "-o", "id"])
        .args(extra)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "product new failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to record a stock movement
pub fn adjust_stock(tmp: &TempDir, id: &str, kind: &str, quantity: i64) {
    minv_in(tmp.path())
        .args(["stock", "adjust", id, "--type", kind, "--quantity"])
        .arg(quantity.to_string())
        .assert()
        .success();
}

/// Parse JSON written to stdout by a command
pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
