// SPDX-License-Identifier: MIT

//! An in-memory [`Store`] for unit testing callers without a live Redis.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use secauto_core::{Job, JobId, JobStatus, Node, NodeId, Schedule, ScheduleId, ScheduleStatus};
use serde_json::Value;

use crate::error::StoreError;
use crate::store::{Backup, Store, StoreMetrics};

#[derive(Default)]
pub struct FakeStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    schedules: Mutex<HashMap<ScheduleId, Schedule>>,
    nodes: Mutex<HashMap<(String, NodeId), Node>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn save_job(&self, job: &Job) -> Result<(), StoreError> {
        self.jobs.lock().insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn load_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.lock().get(id).cloned())
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        self.jobs.lock().remove(id);
        Ok(())
    }

    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<Job> =
            self.jobs.lock().values().filter(|job| status.map(|wanted| job.status == wanted).unwrap_or(true)).cloned().collect();
        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn update_job_status(&self, id: &JobId, status: JobStatus) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.status = status;
        Ok(())
    }

    async fn update_job_results(&self, id: &JobId, results: Vec<Value>) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.results = results;
        Ok(())
    }

    async fn update_job_context(&self, id: &JobId, context: Value) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(id).ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.context = context;
        Ok(())
    }

    async fn save_schedule(&self, schedule: &Schedule) -> Result<(), StoreError> {
        self.schedules.lock().insert(schedule.id.clone(), schedule.clone());
        Ok(())
    }

    async fn load_schedule(&self, id: &ScheduleId) -> Result<Option<Schedule>, StoreError> {
        Ok(self.schedules.lock().get(id).cloned())
    }

    async fn delete_schedule(&self, id: &ScheduleId) -> Result<(), StoreError> {
        self.schedules.lock().remove(id);
        Ok(())
    }

    async fn list_schedules(&self, status: Option<ScheduleStatus>, limit: usize) -> Result<Vec<Schedule>, StoreError> {
        let mut schedules: Vec<Schedule> = self
            .schedules
            .lock()
            .values()
            .filter(|schedule| status.map(|wanted| schedule.status == wanted).unwrap_or(true))
            .cloned()
            .collect();
        schedules.sort_by(|a, b| a.next_run.cmp(&b.next_run));
        schedules.truncate(limit);
        Ok(schedules)
    }

    async fn register_node(&self, cluster: &str, node: &Node, _ttl_secs: u64) -> Result<(), StoreError> {
        self.nodes.lock().insert((cluster.to_string(), node.id), node.clone());
        Ok(())
    }

    async fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, StoreError> {
        Ok(self.nodes.lock().iter().filter(|((c, _), _)| c == cluster).map(|(_, node)| node.clone()).collect())
    }

    async fn deregister_node(&self, cluster: &str, node_id: &NodeId) -> Result<(), StoreError> {
        self.nodes.lock().remove(&(cluster.to_string(), *node_id));
        Ok(())
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, StoreError> {
        let cutoff = chrono::Utc::now() - chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::zero());
        let mut jobs = self.jobs.lock();
        let before = jobs.len();
        jobs.retain(|_, job| job.submitted_at >= cutoff);
        Ok((before - jobs.len()) as u64)
    }

    async fn backup(&self) -> Result<Backup, StoreError> {
        let jobs: Vec<Job> = self.jobs.lock().values().cloned().collect();
        Ok(Backup { timestamp: chrono::Utc::now(), job_count: jobs.len(), jobs })
    }

    async fn metrics(&self) -> Result<StoreMetrics, StoreError> {
        Ok(StoreMetrics { job_count: self.jobs.lock().len(), schedule_count: self.schedules.lock().len() })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
