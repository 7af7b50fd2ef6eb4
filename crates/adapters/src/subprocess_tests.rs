use std::os::unix::fs::PermissionsExt;

use serde_json::json;
use tempfile::tempdir;

use super::*;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

#[tokio::test]
async fn echoes_stdin_as_json_object() {
    let dir = tempdir().expect("tempdir");
    write_script(dir.path(), "echo_back", "cat");
    let executor = SubprocessExecutor::new(dir.path());

    let params: Map<String, Value> = json!({"enriched": true}).as_object().unwrap().clone();
    let result = executor.run("echo_back", params).await.expect("run succeeds");

    assert_eq!(result.get("enriched"), Some(&Value::Bool(true)));
}

#[tokio::test]
async fn nonzero_exit_is_an_executor_error() {
    let dir = tempdir().expect("tempdir");
    write_script(dir.path(), "boom", "echo 'bad input' >&2; exit 1");
    let executor = SubprocessExecutor::new(dir.path());

    let err = executor.run("boom", Map::new()).await.unwrap_err();
    assert!(err.message.contains("bad input"), "error should surface stderr: {err}");
}

#[tokio::test]
async fn non_object_stdout_is_an_executor_error() {
    let dir = tempdir().expect("tempdir");
    write_script(dir.path(), "not_an_object", "echo '[1,2,3]'");
    let executor = SubprocessExecutor::new(dir.path());

    let err = executor.run("not_an_object", Map::new()).await.unwrap_err();
    assert!(err.message.contains("JSON object"));
}

#[tokio::test]
async fn rejects_path_traversal_in_name() {
    let dir = tempdir().expect("tempdir");
    let executor = SubprocessExecutor::new(dir.path());

    let err = executor.run("../etc/passwd", Map::new()).await.unwrap_err();
    assert!(err.message.contains("path separators"));
}

#[tokio::test]
async fn plugin_executor_resolves_against_its_own_directory() {
    let dir = tempdir().expect("tempdir");
    write_script(dir.path(), "scan", "cat");
    let executor = SubprocessPluginExecutor::new(dir.path());

    let params: Map<String, Value> = json!({"ok": true}).as_object().unwrap().clone();
    let result = executor.run("scan", params).await.expect("run succeeds");
    assert_eq!(result.get("ok"), Some(&Value::Bool(true)));
}
