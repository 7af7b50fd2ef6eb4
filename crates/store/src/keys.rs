// SPDX-License-Identifier: MIT

//! Redis key layout, matching the persisted-state contract one row per
//! helper.

use secauto_core::{JobId, NodeId, ScheduleId};

pub fn job_key(id: &JobId) -> String {
    format!("job:{id}")
}

pub const JOBS_INDEX: &str = "jobs:list";

pub fn schedule_key(id: &ScheduleId) -> String {
    format!("schedule:{id}")
}

pub const SCHEDULES_INDEX: &str = "schedules:list";

pub fn node_key(cluster: &str, node_id: &NodeId) -> String {
    format!("secauto:nodes:{cluster}:{node_id}")
}

pub fn node_prefix(cluster: &str) -> String {
    format!("secauto:nodes:{cluster}:")
}

pub fn queue_key(cluster: &str) -> String {
    format!("secauto:jobs:{cluster}")
}

pub fn dist_job_key(id: &JobId) -> String {
    format!("secauto:job:{id}")
}

pub fn backup_key(timestamp_unix: i64) -> String {
    format!("backup:{timestamp_unix}")
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
