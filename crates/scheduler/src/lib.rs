// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! secauto-scheduler: cron/interval/once/recurring schedule registration
//! and firing (§4.6), submitting due schedules through whichever
//! `secauto_engine::JobSubmitter` the caller wires in — the local Job
//! Manager or the clustered path.

pub mod error;
pub mod manager;

pub use error::SchedulerError;
pub use manager::{Scheduler, ScheduleRequest, SchedulerStats};
