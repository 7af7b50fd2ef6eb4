// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-queue: the cluster-path shared priority queue.
//!
//! A thin typed layer over the Store's Redis connection, giving the
//! Cluster Manager's dispatch loop a claim-once `dequeue` on top of the
//! same `secauto:jobs:<cluster>`/`secauto:job:<id>` keys `secauto-store`
//! already defines.

pub mod error;
pub mod fake;
pub mod queue;
pub mod redis_queue;

pub use error::QueueError;
pub use fake::FakeQueue;
pub use queue::DistributedQueue;
pub use redis_queue::RedisQueue;
