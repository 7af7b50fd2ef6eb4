// SPDX-License-Identifier: MIT

//! CLI command implementations.

pub mod cluster;
pub mod job;
pub mod schedule;
pub mod status;

/// Read a playbook's shorthand JSON array from a file path, or from stdin
/// when `path` is `-`.
pub(crate) fn load_playbook(path: &str) -> anyhow::Result<serde_json::Value> {
    let text = if path == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path).map_err(|err| anyhow::anyhow!("reading playbook {path}: {err}"))?
    };
    serde_json::from_str(&text).map_err(|err| anyhow::anyhow!("parsing playbook {path}: {err}"))
}

/// Parse a `key=value` context variable pair.
pub(crate) fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| format!("invalid input '{s}': expected key=value"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Fold `--var key=value` pairs into a JSON context object.
pub(crate) fn context_from_vars(vars: Vec<(String, String)>) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> =
        vars.into_iter().map(|(k, v)| (k, serde_json::Value::String(v))).collect();
    serde_json::Value::Object(map)
}
