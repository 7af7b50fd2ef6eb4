// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-cluster: the Cluster Manager (§4.5) — node registration plus
//! the heartbeat, discovery, and dispatch loops that share one
//! distributed queue across a set of nodes. Implements
//! `secauto_engine::JobSubmitter` by forwarding to the queue instead of
//! an in-process channel, so the Scheduler can target either path
//! through the same trait.

pub mod error;
pub mod manager;

pub use error::ClusterError;
pub use manager::{ClusterInfo, ClusterManager};
