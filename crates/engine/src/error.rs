// SPDX-License-Identifier: MIT

//! Job Manager error kinds.

use secauto_core::JobId;
use secauto_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("job {0} is already in a terminal state")]
    AlreadyTerminal(JobId),
}

/// Returned by [`crate::JobSubmitter::submit`]. A thin alias so the
/// Cluster Manager and Scheduler, which both submit jobs but never touch
/// the Store directly, don't need to depend on `secauto-store`.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission channel is full")]
    ChannelFull,
    #[error("submission channel is closed")]
    ChannelClosed,
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Carries a cluster-path submission failure (e.g. the distributed
    /// queue's enqueue call). Kept as a string rather than a typed
    /// variant so this crate doesn't need a dependency on `secauto-queue`
    /// just for its error enum.
    #[error("submission failed: {0}")]
    Other(String),
}
