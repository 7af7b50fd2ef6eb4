// SPDX-License-Identifier: MIT

//! Dot-path resolution and deep-merge over a JSON-shaped [`Context`](serde_json::Value) tree.
//!
//! A library utility, not a method on the context itself — the context is a
//! plain `serde_json::Value` owned and mutated in place by the worker that
//! owns the job.

use serde_json::Value;

/// Resolve `a.b.c` by walking `value[a][b][c]`. A numeric segment indexes
/// into an array at that position. Returns `None` on any missing/mismatched
/// segment rather than erroring — callers decide whether that's fatal.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Like [`resolve_path`], returning an owned clone for callers that need to
/// detach the result from the context's borrow.
pub fn resolve_path_owned(value: &Value, path: &str) -> Option<Value> {
    resolve_path(value, path).cloned()
}

/// Count the number of distinct top-level variables a context holds, used
/// to enforce `max_variables_per_context`.
pub fn variable_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.len(),
        _ => 1,
    }
}

/// Deep-merge `incoming` into `base` in place: objects merge key-by-key
/// recursively, any other type (including arrays) replaces wholesale.
pub fn deep_merge(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            for (key, value) in incoming_map {
                deep_merge(base_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, incoming) => {
            *base = incoming.clone();
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
