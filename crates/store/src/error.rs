// SPDX-License-Identifier: MIT

//! Store error kinds.

use secauto_core::{JobId, ScheduleId};

/// `StoreUnavailable` in the error taxonomy: a Redis connect/ping failure is
/// fatal at startup and surfaced to the caller of the invoking operation
/// during normal operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis operation failed: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("schedule {0} not found")]
    ScheduleNotFound(ScheduleId),
    #[error("serializing record: {0}")]
    Serialize(#[from] serde_json::Error),
}
