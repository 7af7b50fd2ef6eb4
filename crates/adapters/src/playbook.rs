// SPDX-License-Identifier: MIT

//! Filesystem-backed `PlaybookSource` for `Play(name)` rules.
//!
//! `name` resolves to `{playbooks_dir}/{name}.json`, an author-facing
//! shorthand playbook (the same shape `secauto-rules::parse_playbook`
//! accepts for a top-level submission) parsed once per lookup. There is no
//! caching: a playbook file edited on disk is picked up on the next `Play`
//! without a daemon restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secauto_core::Rule;
use secauto_rules::{parse_playbook, ParseBounds, PlaybookSource};
use tracing::warn;

pub struct FilesystemPlaybookSource {
    playbooks_dir: PathBuf,
    bounds: ParseBounds,
}

impl FilesystemPlaybookSource {
    pub fn new(playbooks_dir: impl Into<PathBuf>, bounds: ParseBounds) -> Self {
        Self { playbooks_dir: playbooks_dir.into(), bounds }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.playbooks_dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl PlaybookSource for FilesystemPlaybookSource {
    async fn load(&self, name: &str) -> Option<Vec<Rule>> {
        let path = self.resolve(name)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(err) => {
                warn!(playbook = name, path = %path.display(), error = %err, "playbook not found");
                return None;
            }
        };
        let value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                warn!(playbook = name, error = %err, "playbook is not valid JSON");
                return None;
            }
        };
        match parse_playbook(&value, self.bounds) {
            Ok(rules) => Some(rules),
            Err(err) => {
                warn!(playbook = name, error = %err, "playbook failed bound validation");
                None
            }
        }
    }
}

/// An always-empty playbook store, for deployments that never use `Play`
/// rules (e.g. a single-node setup driven entirely by submitted playbooks).
pub struct NoPlaybooks;

#[async_trait]
impl PlaybookSource for NoPlaybooks {
    async fn load(&self, _name: &str) -> Option<Vec<Rule>> {
        None
    }
}

#[cfg(test)]
#[path = "playbook_tests.rs"]
mod tests;
