// SPDX-License-Identifier: MIT

//! Subprocess-backed `Executor`/`PluginExecutor`.
//!
//! `name` resolves to `{automations_dir}/{name}` (or `{plugins_dir}/{name}`
//! for the plugin variant). The script is invoked with the merged
//! params-and-context payload as a JSON object on stdin and must print a
//! JSON object on stdout — that object becomes the returned partial
//! context. A non-JSON or non-object stdout is an `ExecutorError`, as is a
//! non-zero exit status.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use secauto_rules::{Executor, ExecutorError, PluginExecutor};
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Rejects `name`s that could escape `dir` via a path separator or `..`
/// segment — automation/plugin names are opaque identifiers, not paths.
fn resolve(dir: &Path, name: &str) -> Result<PathBuf, ExecutorError> {
    if name.is_empty() || name.contains('/') || name.contains("..") {
        return Err(ExecutorError::new(name, "automation name must not contain path separators"));
    }
    Ok(dir.join(name))
}

async fn run_script(path: &Path, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError> {
    let payload = serde_json::to_vec(&Value::Object(params)).map_err(|e| ExecutorError::new(name, e.to_string()))?;

    let mut child = Command::new(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExecutorError::new(name, format!("spawning {}: {e}", path.display())))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&payload).await.map_err(|e| ExecutorError::new(name, format!("writing stdin: {e}")))?;
    }

    let output = child.wait_with_output().await.map_err(|e| ExecutorError::new(name, format!("waiting for exit: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExecutorError::new(name, format!("exited with {}: {}", output.status, stderr.trim())));
    }

    match serde_json::from_slice::<Value>(&output.stdout) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExecutorError::new(name, format!("expected a JSON object on stdout, got {other}"))),
        Err(e) => Err(ExecutorError::new(name, format!("stdout was not valid JSON: {e}"))),
    }
}

/// Runs `Run` rules by shelling out to `{automations_dir}/{name}`.
pub struct SubprocessExecutor {
    automations_dir: PathBuf,
}

impl SubprocessExecutor {
    pub fn new(automations_dir: impl Into<PathBuf>) -> Self {
        Self { automations_dir: automations_dir.into() }
    }
}

#[async_trait]
impl Executor for SubprocessExecutor {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError> {
        let path = resolve(&self.automations_dir, name)?;
        run_script(&path, name, params).await
    }
}

/// Runs `Plugin` rules by shelling out to `{plugins_dir}/{name}`. A distinct
/// type from [`SubprocessExecutor`] so a deployment can point plugin calls
/// at a differently sandboxed directory/binary set.
pub struct SubprocessPluginExecutor {
    plugins_dir: PathBuf,
}

impl SubprocessPluginExecutor {
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self { plugins_dir: plugins_dir.into() }
    }
}

#[async_trait]
impl PluginExecutor for SubprocessPluginExecutor {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError> {
        let path = resolve(&self.plugins_dir, name)?;
        run_script(&path, name, params).await
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
