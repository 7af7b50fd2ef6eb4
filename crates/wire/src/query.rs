// SPDX-License-Identifier: MIT

//! Query types for reading daemon state over the wire.

use secauto_core::{JobStatus, ScheduleStatus};
use serde::{Deserialize, Serialize};

/// Read-only lookups the daemon answers without mutating state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Query {
    GetJob {
        id: String,
    },
    ListJobs {
        #[serde(default)]
        status: Option<JobStatus>,
        limit: usize,
    },
    JobStats,
    GetSchedule {
        id: String,
    },
    ListSchedules {
        #[serde(default)]
        status: Option<ScheduleStatus>,
        limit: usize,
    },
    ScheduleStats,
    ClusterInfo,
    Status,
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
