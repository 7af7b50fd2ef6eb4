// SPDX-License-Identifier: MIT

//! The `Executor` and `PluginExecutor` collaborators.
//!
//! The engine does not dictate how `Run`/`Plugin` rules are actually carried
//! out — subprocess, native plugin, or in-process call are all just
//! implementations of this trait. `name` is opaque to the engine; `params`
//! must be JSON-safe.

use async_trait::async_trait;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
#[error("executor failed running {name:?}: {message}")]
pub struct ExecutorError {
    pub name: String,
    pub message: String,
}

impl ExecutorError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), message: message.into() }
    }
}

/// Runs a named automation with a merged params+context payload, returning
/// an updated partial context to be deep-merged back in.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError>;
}

/// Identical contract to [`Executor`], dispatched for `Plugin` rules instead
/// of `Run` rules. Kept as a distinct trait so a deployment can route plugin
/// calls through a different backend (e.g. a sandboxed subprocess) than
/// ordinary automations.
#[async_trait]
pub trait PluginExecutor: Send + Sync {
    async fn run(&self, name: &str, params: Map<String, Value>) -> Result<Map<String, Value>, ExecutorError>;
}

/// Deep-merge an executor's result into the context.
///
/// Per the external-interfaces contract: the result merges under the key
/// equal to `name`, unless it carries an explicit `context` sub-mapping, in
/// which case that sub-mapping is merged at the top level instead.
pub fn merge_executor_result(ctx: &mut Value, name: &str, result: &Map<String, Value>) {
    if let Some(explicit) = result.get("context") {
        secauto_core::deep_merge(ctx, explicit);
    } else {
        secauto_core::deep_merge(ctx, &Value::Object([(name.to_string(), Value::Object(result.clone()))].into_iter().collect()));
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
