// SPDX-License-Identifier: MIT

//! An in-memory [`DistributedQueue`] for unit testing callers without a
//! live Redis.

use async_trait::async_trait;
use parking_lot::Mutex;
use secauto_core::{Job, JobId};

use crate::error::QueueError;
use crate::queue::DistributedQueue;

#[derive(Default)]
pub struct FakeQueue {
    entries: Mutex<Vec<(JobId, f64)>>,
    bodies: Mutex<std::collections::HashMap<JobId, Job>>,
}

impl FakeQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DistributedQueue for FakeQueue {
    async fn enqueue(&self, job: &Job) -> Result<(), QueueError> {
        let score = (job.submitted_at.timestamp() + job.priority) as f64;
        self.bodies.lock().insert(job.id.clone(), job.clone());
        self.entries.lock().push((job.id.clone(), score));
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<Job>, QueueError> {
        let mut entries = self.entries.lock();
        let min_index = entries
            .iter()
            .enumerate()
            .min_by(|(_, (id_a, score_a)), (_, (id_b, score_b))| {
                score_a.partial_cmp(score_b).unwrap_or(std::cmp::Ordering::Equal).then_with(|| id_a.to_string().cmp(&id_b.to_string()))
            })
            .map(|(index, _)| index);
        let Some(index) = min_index else {
            return Ok(None);
        };
        let (id, _score) = entries.remove(index);
        drop(entries);
        Ok(self.bodies.lock().get(&id).cloned())
    }

    async fn update(&self, job: &Job) -> Result<(), QueueError> {
        self.bodies.lock().insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn size(&self) -> Result<u64, QueueError> {
        Ok(self.entries.lock().len() as u64)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
