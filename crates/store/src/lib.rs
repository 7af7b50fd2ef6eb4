// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-store: persistent job/schedule/node records.
//!
//! [`Store`] is the trait every other crate programs against; [`RedisStore`]
//! is the production backend and [`FakeStore`] an in-memory double for
//! tests. [`keys`] is the Redis key layout shared with `secauto-queue`,
//! which dispatches cluster-path jobs through the same `secauto:job:<id>`
//! bodies this crate writes.

pub mod error;
pub mod fake;
pub mod keys;
pub mod redis_store;
pub mod store;

pub use error::StoreError;
pub use fake::FakeStore;
pub use redis_store::RedisStore;
pub use store::{Backup, Store, StoreMetrics};
