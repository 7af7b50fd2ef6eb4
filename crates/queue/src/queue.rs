// SPDX-License-Identifier: MIT

//! The Distributed Queue contract: a shared priority queue in Redis used
//! by the cluster path, as opposed to the Job Manager's in-process
//! submission channel used by the local path.

use async_trait::async_trait;
use secauto_core::Job;

use crate::error::QueueError;

#[async_trait]
pub trait DistributedQueue: Send + Sync {
    /// Writes the job body, then indexes it with `score = submitted_unix +
    /// priority` — lower scores are dispatched first.
    async fn enqueue(&self, job: &Job) -> Result<(), QueueError>;

    /// Atomically pops the minimum-score member and returns its
    /// dereferenced body. `Ok(None)` means the queue was empty at the
    /// moment of the pop — this is the normal "nothing to dispatch right
    /// now" outcome, not an error. The pop itself is the claim: once an
    /// entry is popped, no other caller can observe it.
    async fn dequeue(&self) -> Result<Option<Job>, QueueError>;

    /// Rewrites the body of an already-dequeued job (e.g. after it
    /// transitions to a terminal state). Does not reinsert it into the
    /// priority index.
    async fn update(&self, job: &Job) -> Result<(), QueueError>;

    async fn size(&self) -> Result<u64, QueueError>;
}
