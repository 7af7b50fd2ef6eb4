//! Playbook submission end to end: CLI -> daemon -> Job Manager -> Rules
//! Engine -> subprocess Executor -> back to a `completed` job.
//!
//! Requires a live Redis reachable at `REDIS_URL` (defaults to
//! `redis://127.0.0.1:6379`); run with `cargo test -- --ignored` against a
//! throwaway instance.

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use serial_test::serial;

use crate::prelude::{poll_until, stdout, Daemon};

/// Writes an `enrich` automation script that echoes back its stdin merged
/// with a fixed flag, matching the concrete scenario in the spec's
/// testable-properties section (`{"enriched":true}`).
fn install_enrich_script(automations_dir: &std::path::Path) {
    let path = automations_dir.join("enrich");
    let mut file = std::fs::File::create(&path).expect("create enrich script");
    writeln!(file, "#!/bin/sh").unwrap();
    writeln!(file, "cat >/dev/null").unwrap();
    writeln!(file, "echo '{{\"enriched\":true}}'").unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod enrich script");
}

#[test]
#[ignore = "requires a live Redis instance and the built secauto/secautod binaries"]
#[serial]
fn simple_run_rule_completes_with_merged_context() {
    let daemon = Daemon::spawn_with(install_enrich_script);

    let playbook_path = daemon_playbook_file(r#"[{"run":"enrich"}]"#);
    let submit = daemon.run(&["job", "submit", playbook_path.to_str().unwrap()]);
    assert!(submit.status.success(), "submit failed: {}", crate::prelude::stderr(&submit));
    let job_id = stdout(&submit).trim().rsplit(' ').next().unwrap().to_string();
    assert!(!job_id.is_empty());

    let job = poll_until(Duration::from_secs(10), || {
        let output = daemon.run(&["--format", "json", "job", "get", &job_id]);
        let value: serde_json::Value = serde_json::from_str(&stdout(&output)).ok()?;
        let status = value.get("status")?.as_str()?.to_string();
        matches!(status.as_str(), "completed" | "failed").then_some(value)
    });

    assert_eq!(job["status"].as_str(), Some("completed"), "job did not complete: {job}");
    assert_eq!(job["context"]["enrich"]["enriched"], serde_json::json!(true));
}

#[test]
#[ignore = "requires a live Redis instance and the built secauto/secautod binaries"]
#[serial]
fn cancel_pending_job_transitions_to_cancelled() {
    let daemon = Daemon::spawn_with(install_enrich_script);

    let playbook_path = daemon_playbook_file(r#"[{"run":"enrich"}]"#);
    let submit = daemon.run(&["job", "submit", playbook_path.to_str().unwrap()]);
    assert!(submit.status.success());
    let job_id = stdout(&submit).trim().rsplit(' ').next().unwrap().to_string();

    let cancel = daemon.run(&["job", "cancel", &job_id]);
    assert!(cancel.status.success());
    let text = stdout(&cancel).to_lowercase();
    assert!(text.contains("cancelled") || text.contains("alreadyterminal"), "unexpected cancel output: {text}");
}

fn daemon_playbook_file(contents: &str) -> std::path::PathBuf {
    let file = tempfile::NamedTempFile::new().expect("create playbook file");
    std::fs::write(file.path(), contents).expect("write playbook");
    let (_, path) = file.keep().expect("persist playbook file");
    path
}
