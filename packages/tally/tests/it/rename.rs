//! End-to-end tests for `tally rename`.

use pretty_assertions::assert_eq as pretty_assert_eq;
use tempfile::TempDir;

use crate::run_tally;

#[test]
fn test_rename_moves_history() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    run_tally(&store, &["write", "--filename", "old.mdc", "--by", "cursor"]);

    let (exit_code, stdout, _stderr) = run_tally(&store, &["rename", "old.mdc", "new.mdc"]);
    pretty_assert_eq!(exit_code, 0, "rename should exit 0, stdout: {stdout}");
    assert!(
        stdout.contains("old.mdc") && stdout.contains("new.mdc"),
        "rename should confirm both names, got: {stdout}"
    );

    let content = std::fs::read_to_string(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(parsed["rules"].get("old.mdc").is_none());
    assert!(parsed["rules"]["new.mdc"]["previousNames"][0] == "old.mdc");

    // The previous name shows up in the report.
    let (_exit_code, stdout, _stderr) = run_tally(&store, &["read"]);
    assert!(
        stdout.contains("Previous Names") && stdout.contains("old.mdc"),
        "report should list the previous name, got: {stdout}"
    );
}

#[test]
fn test_rename_merges_existing_target() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    run_tally(&store, &["write", "--filename", "a.mdc", "--by", "cursor"]);
    run_tally(&store, &["write", "--filename", "a.mdc", "--by", "cursor"]);
    run_tally(&store, &["write", "--filename", "b.mdc", "--by", "cursor"]);

    let (exit_code, stdout, _stderr) = run_tally(&store, &["rename", "a.mdc", "b.mdc"]);
    pretty_assert_eq!(exit_code, 0);
    assert!(
        stdout.contains("merged"),
        "merging rename should say so, got: {stdout}"
    );

    let content = std::fs::read_to_string(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(
        parsed["rules"]["b.mdc"]["usage"]["cursor"]["usageCount"] == 3,
        "merged counts should sum, got: {content}"
    );
}

#[test]
fn test_rename_missing_source_fails_without_mutation() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    let (exit_code, _stdout, stderr) = run_tally(&store, &["rename", "ghost.mdc", "x.mdc"]);

    assert!(exit_code != 0, "renaming a missing rule should fail");
    assert!(
        stderr.contains("ghost.mdc"),
        "error should name the missing rule, got: {stderr}"
    );
    assert!(
        !store.exists(),
        "a failed rename must not create or mutate the store"
    );
}
