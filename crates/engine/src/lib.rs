// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-engine: the Job Manager — local submission, worker pool,
//! crash recovery, and retention sweep — built on top of
//! `secauto-rules::Engine` and `secauto-store::Store`.

pub mod cleanup;
pub mod error;
pub mod manager;
pub mod recovery;
pub mod submitter;

pub use error::{EngineError, SubmitError};
pub use manager::{CancelOutcome, JobManager, JobStats};
pub use recovery::recover;
pub use submitter::JobSubmitter;
