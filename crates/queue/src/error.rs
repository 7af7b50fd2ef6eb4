// SPDX-License-Identifier: MIT

//! Queue error kinds.

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("redis operation failed: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serializing queued job: {0}")]
    Serialize(#[from] serde_json::Error),
}
