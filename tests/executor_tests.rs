// Integration tests for applying rename plans

use std::fs;

use epguide_rename::executor::{
    RenameOutcome, RenameSummary, execute, rename_entry, resolve_available_name,
};
use epguide_rename::rename_engine::RenamePlanEntry;
use tokio_util::sync::CancellationToken;

fn entry(original: &str, new_name: &str, number: usize) -> RenamePlanEntry {
    RenamePlanEntry {
        original_name: original.to_string(),
        new_name: new_name.to_string(),
        episode_number: number,
        episode_title: new_name.trim_end_matches(".mkv").to_string(),
    }
}

#[test]
fn test_resolve_available_name() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(resolve_available_name(dir.path(), "a.mkv", "B.mkv"), "B.mkv");

    fs::write(dir.path().join("B.mkv"), b"x").unwrap();
    fs::write(dir.path().join("B_1.mkv"), b"x").unwrap();
    assert_eq!(resolve_available_name(dir.path(), "a.mkv", "B.mkv"), "B_2.mkv");

    // Renaming a file onto its own name is not a collision.
    assert_eq!(resolve_available_name(dir.path(), "B.mkv", "B.mkv"), "B.mkv");
}

#[test]
fn test_existing_target_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), b"new").unwrap();
    fs::write(dir.path().join("Show S01 E01 - Pilot.mkv"), b"old").unwrap();

    let result = rename_entry(dir.path(), &entry("a.mkv", "Show S01 E01 - Pilot.mkv", 1));
    assert_eq!(
        result.outcome,
        RenameOutcome::Renamed {
            to: "Show S01 E01 - Pilot_1.mkv".to_string()
        }
    );
    assert_eq!(
        fs::read(dir.path().join("Show S01 E01 - Pilot.mkv")).unwrap(),
        b"old"
    );
    assert_eq!(
        fs::read(dir.path().join("Show S01 E01 - Pilot_1.mkv")).unwrap(),
        b"new"
    );
}

#[test]
fn test_collisions_within_one_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), b"a").unwrap();
    fs::write(dir.path().join("b.mkv"), b"b").unwrap();

    let plan = vec![entry("a.mkv", "Same.mkv", 1), entry("b.mkv", "Same.mkv", 2)];
    let results = execute(dir.path(), &plan, &CancellationToken::new());

    assert!(results.iter().all(|r| r.success()));
    assert_eq!(fs::read(dir.path().join("Same.mkv")).unwrap(), b"a");
    assert_eq!(fs::read(dir.path().join("Same_1.mkv")).unwrap(), b"b");
}

#[test]
fn test_partial_failure_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), b"a").unwrap();
    fs::write(dir.path().join("c.mkv"), b"c").unwrap();

    let plan = vec![
        entry("a.mkv", "One.mkv", 1),
        entry("b.mkv", "Two.mkv", 2),
        entry("c.mkv", "Three.mkv", 3),
    ];
    let results = execute(dir.path(), &plan, &CancellationToken::new());

    assert!(results[0].success());
    assert!(results[1].error_message().is_some());
    assert!(results[2].success());
    assert!(dir.path().join("One.mkv").exists());
    assert!(dir.path().join("Three.mkv").exists());

    let summary = RenameSummary::from_results(&results);
    assert_eq!(
        summary,
        RenameSummary {
            total: 3,
            renamed: 2,
            failed: 1,
            cancelled: 0
        }
    );
}

#[test]
fn test_cancelled_batch_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.mkv"), b"a").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let results = execute(dir.path(), &[entry("a.mkv", "One.mkv", 1)], &cancel);

    assert_eq!(results[0].outcome, RenameOutcome::Cancelled);
    assert!(dir.path().join("a.mkv").exists());
    assert!(!dir.path().join("One.mkv").exists());
}
