// SPDX-License-Identifier: MIT

//! `{{path}}` template substitution for `Run`/`Plugin` parameter values.
//!
//! This is the string-substitution half of the template-vs-var distinction:
//! every occurrence of `{{path}}` inside a string parameter is replaced by
//! the stringified result of resolving `path` against the context, *before*
//! the automation is invoked. Unknown paths are left as-is, same as an
//! unresolved variable reference in an ordinary template engine.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
static TEMPLATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_.]*)\s*\}\}").expect("constant regex pattern is valid"));

/// Stringify a resolved value the way a template substitution should:
/// strings pass through unquoted, everything else uses its JSON rendering.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{{path}}` occurrence in `template` with the stringified
/// resolution of `path` against `ctx`. Paths that don't resolve are left
/// untouched.
pub fn substitute(template: &str, ctx: &Value) -> String {
    TEMPLATE_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let path = &caps[1];
            match secauto_core::resolve_path(ctx, path) {
                Some(value) => stringify(value),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Apply [`substitute`] to every string leaf of a params map, recursively
/// through nested objects/arrays, leaving non-string values untouched.
pub fn substitute_params(params: &Value, ctx: &Value) -> Value {
    match params {
        Value::String(s) => Value::String(substitute(s, ctx)),
        Value::Object(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.clone(), substitute_params(v, ctx))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute_params(v, ctx)).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
