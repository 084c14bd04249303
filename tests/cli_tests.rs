//! End-to-end runs of the `regrade` binary against a scratch store.


use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use regrade::{ReconciliationReport, quiz::CheckedAnswer, reconcile::FailureReason};
use store_support::{read_json, response_json, scratch_store};

fn regrade_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("regrade");
    cmd.env_remove("REGRADE_STORE")
        .env_remove("REGRADE_CONCURRENCY")
        .env_remove("REGRADE_MALFORMED")
        .env_remove("REGRADE_DRY_RUN")
        .env("RUST_LOG", "warn");
    cmd
}

fn backfill(store: &Path, extra: &[&str]) -> ReconciliationReport {
    let assert = regrade_cmd()
        .arg("backfill")
        .args(extra)
        .arg(store)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).expect("report JSON on stdout")
}

#[test]
fn backfill_prints_a_report_and_persists() {
    let store = scratch_store("legacy.json");

    let report = backfill(&store, &[]);
    assert_eq!(report.migrated, 3);
    assert_eq!(report.errors.len(), 1);
    assert!(!report.dry_run);

    let document = read_json(&store);
    assert_eq!(
        response_json(&document, "resp-ungraded")["score"],
        serde_json::json!(5.0)
    );

    let again = backfill(&store, &[]);
    assert_eq!(again.migrated, 0);
    assert_eq!(again.skipped, 3);
}

#[test]
fn dry_run_leaves_the_document_untouched() {
    let store = scratch_store("legacy.json");
    let before = std::fs::read(&store).expect("read");

    let report = backfill(&store, &["--dry-run"]);

    assert!(report.dry_run);
    assert_eq!(report.migrated, 3);
    assert_eq!(std::fs::read(&store).expect("read"), before);
}

#[test]
fn strict_and_filters_are_honoured() {
    let store = scratch_store("legacy.json");

    let strict = backfill(&store, &["--strict", "--quiz", "quiz-essay"]);
    assert_eq!(strict.migrated, 0);
    assert_eq!(strict.errors.len(), 1);
    assert!(matches!(
        strict.errors[0].reason,
        FailureReason::MalformedQuestion { .. }
    ));

    let one = backfill(&store, &["--response", "resp-legacy", "-j", "1"]);
    assert_eq!(one.processed(), 1);
    assert_eq!(one.migrated, 1);
}

#[test]
fn store_can_come_from_the_environment() {
    let store = scratch_store("legacy.json");

    let assert = regrade_cmd()
        .env("REGRADE_STORE", &store)
        .arg("backfill")
        .arg("--ungraded")
        .assert()
        .success();
    let report: ReconciliationReport =
        serde_json::from_slice(&assert.get_output().stdout).expect("report");

    assert_eq!(report.migrated, 2);
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn recompute_prints_checked_answers() {
    let store = scratch_store("legacy.json");

    let assert = regrade_cmd()
        .arg("recompute")
        .arg("quiz-algebra")
        .arg("resp-ungraded")
        .arg(&store)
        .assert()
        .success();
    let checked: Vec<CheckedAnswer> =
        serde_json::from_slice(&assert.get_output().stdout).expect("checked answers");

    let verdicts: Vec<_> = checked
        .iter()
        .map(|c| (c.question_id.as_str(), c.correct))
        .collect();
    assert_eq!(verdicts, [("q1", true), ("q2", false), ("q3", true)]);

    let document = read_json(&store);
    assert_eq!(
        response_json(&document, "resp-ungraded")["total"],
        serde_json::json!(6.0)
    );
}

#[test]
fn recompute_fails_for_unknown_records() {
    let store = scratch_store("legacy.json");

    regrade_cmd()
        .arg("recompute")
        .arg("quiz-algebra")
        .arg("resp-missing")
        .arg(&store)
        .assert()
        .failure();

    regrade_cmd()
        .arg("recompute")
        .arg("quiz-retired")
        .arg("resp-orphan")
        .arg(&store)
        .assert()
        .failure();
}

#[test]
fn backfill_without_a_store_fails() {
    regrade_cmd().arg("backfill").assert().failure();
}
