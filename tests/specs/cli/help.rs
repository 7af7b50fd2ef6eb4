//! `--help` surfaces every documented subcommand. Needs no daemon or Redis.

use crate::prelude::secauto_cmd;

#[test]
fn top_level_help_lists_subcommands() {
    let output = secauto_cmd().arg("--help").output().expect("run secauto --help");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["job", "schedule", "cluster", "status", "ping", "shutdown"] {
        assert!(text.contains(subcommand), "missing `{subcommand}` in help text:\n{text}");
    }
}

#[test]
fn job_help_lists_actions() {
    let output = secauto_cmd().args(["job", "--help"]).output().expect("run secauto job --help");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    for action in ["submit", "get", "list", "cancel", "stats"] {
        assert!(text.contains(action), "missing `{action}` in job help text:\n{text}");
    }
}

#[test]
fn missing_subcommand_exits_nonzero() {
    let output = secauto_cmd().output().expect("run secauto");
    assert!(!output.status.success());
}
