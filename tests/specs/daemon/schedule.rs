//! Schedule creation and an interval schedule firing jobs (§4.6, §8
//! scenario 6).
//!
//! Requires a live Redis reachable at `REDIS_URL` (defaults to
//! `redis://127.0.0.1:6379`); run with `cargo test -- --ignored` against a
//! throwaway instance.

use std::time::Duration;

use serial_test::serial;

use crate::prelude::{poll_until, stdout, Daemon};

#[test]
#[ignore = "requires a live Redis instance and the built secauto/secautod binaries"]
#[serial]
fn create_rejects_a_once_schedule_whose_start_time_has_passed() {
    let daemon = Daemon::spawn();
    let playbook = write_playbook(r#"[{"value":true}]"#);
    let output = daemon.run(&[
        "schedule",
        "create",
        "stale",
        playbook.to_str().unwrap(),
        "--schedule-type",
        "once",
        "--start-time",
        "2000-01-01T00:00:00Z",
    ]);
    assert!(!output.status.success(), "expected rejection, got: {}", stdout(&output));
}

#[test]
#[ignore = "requires a live Redis instance and the built secauto/secautod binaries"]
#[serial]
fn interval_schedule_fires_up_to_max_runs_then_expires() {
    let daemon = Daemon::spawn();
    let playbook = write_playbook(r#"[{"value":true}]"#);
    let create = daemon.run(&[
        "--format",
        "json",
        "schedule",
        "create",
        "ticker",
        playbook.to_str().unwrap(),
        "--schedule-type",
        "interval",
        "--interval-secs",
        "1",
        "--max-runs",
        "3",
    ]);
    assert!(create.status.success(), "create failed: {}", crate::prelude::stderr(&create));
    let created: serde_json::Value = serde_json::from_str(&stdout(&create)).expect("parse created schedule");
    let id = created["id"].as_str().expect("schedule id").to_string();

    let expired = poll_until(Duration::from_secs(10), || {
        let output = daemon.run(&["--format", "json", "schedule", "get", &id]);
        let value: serde_json::Value = serde_json::from_str(&stdout(&output)).ok()?;
        (value["status"].as_str()? == "expired").then_some(value)
    });

    assert_eq!(expired["run_count"].as_u64(), Some(3));
    assert!(expired["next_run"].is_null());
}

fn write_playbook(contents: &str) -> std::path::PathBuf {
    let file = tempfile::NamedTempFile::new().expect("create playbook file");
    std::fs::write(file.path(), contents).expect("write playbook");
    let (_, path) = file.keep().expect("persist playbook file");
    path
}
