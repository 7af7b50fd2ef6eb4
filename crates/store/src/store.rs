// SPDX-License-Identifier: MIT

//! The `Store` contract: `Save/Load/Delete(job)`, `List`, `UpdateStatus`,
//! `UpdateResults`, `UpdateContext`, and equivalents for schedules, plus
//! `Cleanup`, `Backup`, `Metrics`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secauto_core::{Job, JobId, JobStatus, Node, NodeId, Schedule, ScheduleId, ScheduleStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// `{timestamp, job_count, jobs: [...]}`, matching the persisted-state
/// contract's backup document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: DateTime<Utc>,
    pub job_count: usize,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub job_count: usize,
    pub schedule_count: usize,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn save_job(&self, job: &Job) -> Result<(), StoreError>;
    async fn load_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    async fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;
    /// Newest-first, respecting `limit`; filtering by `status` happens
    /// client-side to the limit.
    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, StoreError>;
    async fn update_job_status(&self, id: &JobId, status: JobStatus) -> Result<(), StoreError>;
    async fn update_job_results(&self, id: &JobId, results: Vec<Value>) -> Result<(), StoreError>;
    async fn update_job_context(&self, id: &JobId, context: Value) -> Result<(), StoreError>;

    async fn save_schedule(&self, schedule: &Schedule) -> Result<(), StoreError>;
    async fn load_schedule(&self, id: &ScheduleId) -> Result<Option<Schedule>, StoreError>;
    async fn delete_schedule(&self, id: &ScheduleId) -> Result<(), StoreError>;
    async fn list_schedules(&self, status: Option<ScheduleStatus>, limit: usize) -> Result<Vec<Schedule>, StoreError>;

    async fn register_node(&self, cluster: &str, node: &Node, ttl_secs: u64) -> Result<(), StoreError>;
    async fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, StoreError>;
    async fn deregister_node(&self, cluster: &str, node_id: &NodeId) -> Result<(), StoreError>;

    /// Deletes jobs whose `submitted_at` is older than `max_age`; returns
    /// the count removed.
    async fn cleanup(&self, max_age: Duration) -> Result<u64, StoreError>;
    async fn backup(&self) -> Result<Backup, StoreError>;
    async fn metrics(&self) -> Result<StoreMetrics, StoreError>;
}
