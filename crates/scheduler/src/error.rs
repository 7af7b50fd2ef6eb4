// SPDX-License-Identifier: MIT

//! Scheduler error kinds.

use secauto_core::ScheduleId;
use secauto_engine::SubmitError;
use secauto_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("schedule {0} not found")]
    NotFound(ScheduleId),
    #[error("invalid cron expression: {0}")]
    InvalidCron(#[from] cron::error::Error),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}
