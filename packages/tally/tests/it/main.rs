//! Integration tests for the tally CLI.
//!
//! Each test points `TALLY_STORE` at a file inside a fresh temporary
//! directory and drives the built binary end to end.

mod rename;
mod write;

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a tally subcommand against `store`, returning (exit_code, stdout, stderr).
pub fn run_tally(store: &Path, args: &[&str]) -> (i32, String, String) {
    let status = Command::new("cargo")
        .args(["build", "--quiet", "-p", "tally"])
        .status()
        .expect("failed to build tally");
    assert!(status.success(), "cargo build failed");

    let mut cmd_args = vec!["run", "--quiet", "-p", "tally", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .env("TALLY_STORE", store)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run tally");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
