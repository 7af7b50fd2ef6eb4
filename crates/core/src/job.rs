// SPDX-License-Identifier: MIT

//! Job lifecycle data model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rule::Rule;

crate::define_id! {
    /// Identity of a submitted playbook execution.
    pub struct JobId("job-");
}

/// Lifecycle status of a [`Job`]. Terminal variants are `Completed`, `Failed`, `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// A submitted playbook execution: identity, payload, and lifecycle fields.
///
/// Invariants (see `DESIGN.md`): `started_at` is set iff `status >= Running`;
/// `completed_at` is set iff `status` is terminal; `assigned_node` is immutable
/// once set until a recovery pass reassigns it after a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub playbook: Vec<Rule>,
    pub context: Value,
    pub priority: i64,
    pub tags: BTreeSet<String>,

    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_node: Option<String>,
    pub results: Vec<Value>,
    pub error: Option<String>,
    pub retry_count: u32,
}

impl Job {
    /// Construct a freshly submitted, `pending` job.
    pub fn new(playbook: Vec<Rule>, context: Value, priority: i64, tags: BTreeSet<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: JobId::new(),
            playbook,
            context,
            priority,
            tags,
            status: JobStatus::Pending,
            submitted_at: now,
            started_at: None,
            completed_at: None,
            assigned_node: None,
            results: Vec::new(),
            error: None,
            retry_count: 0,
        }
    }

    /// Dispatch score used by the Redis sorted-set indices: lower dispatches first.
    pub fn score(&self) -> f64 {
        self.submitted_at.timestamp() as f64 + self.priority as f64
    }

    pub fn mark_running(&mut self, node: impl Into<String>, now: DateTime<Utc>) {
        self.status = JobStatus::Running;
        self.started_at = Some(now);
        self.assigned_node = Some(node.into());
    }

    pub fn mark_completed(&mut self, results: Vec<Value>, now: DateTime<Utc>) {
        self.status = JobStatus::Completed;
        self.results = results;
        self.completed_at = Some(now);
    }

    pub fn mark_failed(&mut self, error: impl Into<String>, results: Vec<Value>, now: DateTime<Utc>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.results = results;
        self.completed_at = Some(now);
    }

    pub fn mark_cancelled(&mut self, results: Vec<Value>, now: DateTime<Utc>) {
        self.status = JobStatus::Cancelled;
        self.results = results;
        self.completed_at = Some(now);
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct JobBuilder {
    playbook: Vec<Rule>,
    context: Value,
    priority: i64,
    tags: BTreeSet<String>,
    now: DateTime<Utc>,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for JobBuilder {
    fn default() -> Self {
        Self { playbook: Vec::new(), context: Value::Object(Default::default()), priority: 0, tags: BTreeSet::new(), now: Utc::now() }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobBuilder {
    pub fn playbook(mut self, playbook: Vec<Rule>) -> Self {
        self.playbook = playbook;
        self
    }

    pub fn context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn build(self) -> Job {
        Job::new(self.playbook, self.context, self.priority, self.tags, self.now)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
