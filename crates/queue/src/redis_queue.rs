// SPDX-License-Identifier: MIT

//! Redis-backed [`DistributedQueue`].
//!
//! Reuses the key layout `secauto-store` already defines for the cluster
//! queue (`secauto:jobs:<cluster>` sorted set, `secauto:job:<id>` bodies)
//! so the Store and Queue agree on where cluster-path jobs live.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use secauto_core::Job;
use secauto_store::keys;

use crate::error::QueueError;
use crate::queue::DistributedQueue;

const DIST_JOB_TTL_SECS: u64 = 24 * 3600;

pub struct RedisQueue {
    conn: ConnectionManager,
    cluster: String,
}

impl RedisQueue {
    pub fn new(conn: ConnectionManager, cluster: impl Into<String>) -> Self {
        Self { conn, cluster: cluster.into() }
    }

    pub async fn connect(redis_url: &str, cluster: impl Into<String>) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self::new(conn, cluster))
    }
}

#[async_trait]
impl DistributedQueue for RedisQueue {
    async fn enqueue(&self, job: &Job) -> Result<(), QueueError> {
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(job)?;
        let _: () = conn.set_ex(keys::dist_job_key(&job.id), body, DIST_JOB_TTL_SECS).await?;
        let score = (job.submitted_at.timestamp() + job.priority) as f64;
        let _: i64 = conn.zadd(keys::queue_key(&self.cluster), job.id.to_string(), score).await?;
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<Job>, QueueError> {
        let mut conn = self.conn.clone();
        let popped: Vec<(String, f64)> = conn.zpopmin(keys::queue_key(&self.cluster), 1).await?;
        let Some((id, _score)) = popped.into_iter().next() else {
            return Ok(None);
        };
        let body: Option<String> = conn.get(format!("secauto:job:{id}")).await?;
        Ok(match body {
            Some(body) => Some(serde_json::from_str(&body)?),
            None => None,
        })
    }

    async fn update(&self, job: &Job) -> Result<(), QueueError> {
        let mut conn = self.conn.clone();
        let body = serde_json::to_string(job)?;
        let _: () = conn.set_ex(keys::dist_job_key(&job.id), body, DIST_JOB_TTL_SECS).await?;
        Ok(())
    }

    async fn size(&self) -> Result<u64, QueueError> {
        let mut conn = self.conn.clone();
        let size: u64 = conn.zcard(keys::queue_key(&self.cluster)).await?;
        Ok(size)
    }
}

#[cfg(test)]
#[path = "redis_queue_tests.rs"]
mod tests;
