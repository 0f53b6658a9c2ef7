//! End-to-end tests for `tally write`.

use pretty_assertions::assert_eq as pretty_assert_eq;
use tempfile::TempDir;

use crate::run_tally;

#[test]
fn test_write_creates_a_fresh_store() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    let (exit_code, stdout, _stderr) = run_tally(
        &store,
        &["write", "--filename", "commit-style.mdc", "--by", "Roo Code"],
    );

    pretty_assert_eq!(exit_code, 0, "write should exit 0, stdout: {stdout}");
    assert!(
        stdout.contains("commit-style.mdc") && stdout.contains("Roo Code"),
        "write should confirm what it recorded, got: {stdout}"
    );

    let content = std::fs::read_to_string(&store).unwrap();
    assert!(
        content.contains("\"roo-code\""),
        "agent key should be normalized on disk, got: {content}"
    );
    assert!(
        content.contains("\"usageCount\": 1"),
        "first write should record a count of 1, got: {content}"
    );
}

#[test]
fn test_write_increments_existing_record() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    let args = ["write", "--filename", "r.mdc", "--by", "cursor"];
    run_tally(&store, &args);
    let (exit_code, _stdout, _stderr) = run_tally(&store, &args);

    pretty_assert_eq!(exit_code, 0);
    let content = std::fs::read_to_string(&store).unwrap();
    assert!(
        content.contains("\"usageCount\": 2"),
        "second write should bump the count to 2, got: {content}"
    );
}

#[test]
fn test_write_recovers_from_corrupt_store() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");
    std::fs::write(&store, "not valid json{{{").unwrap();

    let (exit_code, _stdout, _stderr) =
        run_tally(&store, &["write", "--filename", "r.mdc", "--by", "cursor"]);

    pretty_assert_eq!(exit_code, 0, "write should recover from a corrupt store");
    let content = std::fs::read_to_string(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(
        parsed["rules"]["r.mdc"]["usage"]["cursor"]["usageCount"] == 1,
        "fresh store should contain the new record, got: {content}"
    );
}

#[test]
fn test_write_requires_agent_argument() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("usage.json");

    let (exit_code, _stdout, stderr) = run_tally(&store, &["write", "--filename", "r.mdc"]);

    assert!(exit_code != 0, "write without --by should fail");
    assert!(
        stderr.contains("--by") || stderr.contains("required"),
        "usage error should mention the missing argument, got: {stderr}"
    );
}
