// SPDX-License-Identifier: MIT

//! In-process `Executor`/`PluginExecutor` backed by a fixed response table.
//!
//! Useful both as a test double and as a minimal in-process backend for
//! automations that don't warrant a subprocess (e.g. pure functions of
//! their params).

use std::collections::HashMap;

use async_trait::async_trait;
use secauto_rules::{Executor, ExecutorError, PluginExecutor};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

/// Maps an automation name to either a canned result or a forced failure.
pub struct MockExecutor {
    responses: HashMap<String, Result<Map<String, Value>, String>>,
    calls: Mutex<Vec<(String, Map<String, Value>)>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self { responses: HashMap::new(), calls: Mutex::new(Vec::new()) }
    }

    pub fn with_response(mut self, name: impl Into<String>, result: Map<String, Value>) -> Self {
        self.responses.insert(name.into(), Ok(result));
        self
    }

    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(name.into(), Err(message.into()));
        self
    }

    /// Names invoked so far, in call order, alongside the params they were given.
    pub async fn calls(&self) -> Vec<(String, Map<String, Value>)> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

async fn dispatch(
    responses: &HashMap<String, Result<Map<String, Value>, String>>,
    calls: &Mutex<Vec<(String, Map<String, Value>)>>,
    name: &str,
    params: Map<String, Value>,
) -> Result<Map<String, Value>, ExecutorError> {
    calls.lock().await.push((name.to_string(), params));
    match responses.get(name) {
        Some(Ok(result)) => Ok(result.clone()),
        Some(Err(message)) => Err(ExecutorError::new(name, message.clone())),
        None => Ok(Map::new()),
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError> {
        dispatch(&self.responses, &self.calls, name, params).await
    }
}

#[async_trait]
impl PluginExecutor for MockExecutor {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError> {
        dispatch(&self.responses, &self.calls, name, params).await
    }
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
