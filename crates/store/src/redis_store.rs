// SPDX-License-Identifier: MIT

//! Redis-backed [`Store`] implementation.
//!
//! Uses a cloneable [`ConnectionManager`] the way `apalis-redis`'s storage
//! does: each call clones the handle rather than holding a connection
//! across an await point under a lock.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use secauto_core::{Job, JobId, JobStatus, Node, NodeId, Schedule, ScheduleId, ScheduleStatus};
use serde_json::Value;

use crate::error::StoreError;
use crate::keys;
use crate::store::{Backup, Store, StoreMetrics};

pub struct RedisStore {
    conn: ConnectionManager,
    job_ttl: Duration,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager, job_ttl: Duration) -> Self {
        Self { conn, job_ttl }
    }

    pub async fn connect(redis_url: &str, job_ttl: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::new(conn, job_ttl))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn save_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(job)?;
        let ttl = self.job_ttl.as_secs().max(1);
        let _: () = conn.set_ex(keys::job_key(&job.id), body, ttl).await?;
        let _: i64 = conn.zadd(keys::JOBS_INDEX, job.id.to_string(), job.submitted_at.timestamp() as f64).await?;
        Ok(())
    }

    async fn load_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let mut conn = self.conn.clone();
        let body: Option<String> = conn.get(keys::job_key(id)).await?;
        Ok(body.map(|body| serde_json::from_str(&body)).transpose()?)
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(keys::job_key(id)).await?;
        let _: i64 = conn.zrem(keys::JOBS_INDEX, id.to_string()).await?;
        Ok(())
    }

    async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, StoreError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.zrevrange(keys::JOBS_INDEX, 0, -1).await?;
        let mut jobs = Vec::with_capacity(limit.min(ids.len()));
        for id in ids {
            if jobs.len() >= limit {
                break;
            }
            let body: Option<String> = conn.get(format!("job:{id}")).await?;
            let Some(body) = body else { continue };
            let job: Job = serde_json::from_str(&body)?;
            if status.map(|wanted| job.status == wanted).unwrap_or(true) {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    async fn update_job_status(&self, id: &JobId, status: JobStatus) -> Result<(), StoreError> {
        let mut job = self.load_job(id).await?.ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.status = status;
        self.save_job(&job).await
    }

    async fn update_job_results(&self, id: &JobId, results: Vec<Value>) -> Result<(), StoreError> {
        let mut job = self.load_job(id).await?.ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.results = results;
        self.save_job(&job).await
    }

    async fn update_job_context(&self, id: &JobId, context: Value) -> Result<(), StoreError> {
        let mut job = self.load_job(id).await?.ok_or_else(|| StoreError::JobNotFound(id.clone()))?;
        job.context = context;
        self.save_job(&job).await
    }

    async fn save_schedule(&self, schedule: &Schedule) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(schedule)?;
        let _: () = conn.set(keys::schedule_key(&schedule.id), body).await?;
        let score = schedule.next_run.map(|t| t.timestamp() as f64).unwrap_or(f64::MAX);
        let _: i64 = conn.zadd(keys::SCHEDULES_INDEX, schedule.id.to_string(), score).await?;
        Ok(())
    }

    async fn load_schedule(&self, id: &ScheduleId) -> Result<Option<Schedule>, StoreError> {
        let mut conn = self.conn.clone();
        let body: Option<String> = conn.get(keys::schedule_key(id)).await?;
        Ok(body.map(|body| serde_json::from_str(&body)).transpose()?)
    }

    async fn delete_schedule(&self, id: &ScheduleId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(keys::schedule_key(id)).await?;
        let _: i64 = conn.zrem(keys::SCHEDULES_INDEX, id.to_string()).await?;
        Ok(())
    }

    async fn list_schedules(&self, status: Option<ScheduleStatus>, limit: usize) -> Result<Vec<Schedule>, StoreError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.zrange(keys::SCHEDULES_INDEX, 0, -1).await?;
        let mut schedules = Vec::with_capacity(limit.min(ids.len()));
        for id in ids {
            if schedules.len() >= limit {
                break;
            }
            let body: Option<String> = conn.get(format!("schedule:{id}")).await?;
            let Some(body) = body else { continue };
            let schedule: Schedule = serde_json::from_str(&body)?;
            if status.map(|wanted| schedule.status == wanted).unwrap_or(true) {
                schedules.push(schedule);
            }
        }
        Ok(schedules)
    }

    async fn register_node(&self, cluster: &str, node: &Node, ttl_secs: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(node)?;
        let _: () = conn.set_ex(keys::node_key(cluster, &node.id), body, ttl_secs.max(1)).await?;
        Ok(())
    }

    async fn list_nodes(&self, cluster: &str) -> Result<Vec<Node>, StoreError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", keys::node_prefix(cluster));
        let mut nodes = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, found): (u64, Vec<String>) =
                redis::cmd("SCAN").arg(cursor).arg("MATCH").arg(&pattern).arg("COUNT").arg(100).query_async(&mut conn).await?;
            for key in found {
                let body: Option<String> = conn.get(&key).await?;
                if let Some(body) = body {
                    if let Ok(node) = serde_json::from_str::<Node>(&body) {
                        nodes.push(node);
                    }
                }
            }
            if next_cursor == 0 {
                break;
            }
            cursor = next_cursor;
        }
        Ok(nodes)
    }

    async fn deregister_node(&self, cluster: &str, node_id: &NodeId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(keys::node_key(cluster, node_id)).await?;
        Ok(())
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.zrange(keys::JOBS_INDEX, 0, -1).await?;
        let cutoff = Utc::now() - chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::zero());
        let mut removed = 0u64;
        for id in ids {
            let body: Option<String> = conn.get(format!("job:{id}")).await?;
            let Some(body) = body else {
                let _: i64 = conn.zrem(keys::JOBS_INDEX, &id).await?;
                continue;
            };
            let job: Job = serde_json::from_str(&body)?;
            if job.submitted_at < cutoff {
                let _: i64 = conn.del(format!("job:{id}")).await?;
                let _: i64 = conn.zrem(keys::JOBS_INDEX, &id).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn backup(&self) -> Result<Backup, StoreError> {
        let jobs = self.list_jobs(None, usize::MAX).await?;
        let backup = Backup { timestamp: Utc::now(), job_count: jobs.len(), jobs };
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(&backup)?;
        let seven_days = 7 * 24 * 3600;
        let _: () = conn.set_ex(keys::backup_key(backup.timestamp.timestamp()), body, seven_days).await?;
        Ok(backup)
    }

    async fn metrics(&self) -> Result<StoreMetrics, StoreError> {
        let mut conn = self.conn.clone();
        let job_count: u64 = conn.zcard(keys::JOBS_INDEX).await?;
        let schedule_count: u64 = conn.zcard(keys::SCHEDULES_INDEX).await?;
        Ok(StoreMetrics { job_count: job_count as usize, schedule_count: schedule_count as usize })
    }
}

#[cfg(test)]
#[path = "redis_store_tests.rs"]
mod tests;
