// SPDX-License-Identifier: MIT

//! Cluster Manager error kinds.

use secauto_queue::QueueError;
use secauto_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}
