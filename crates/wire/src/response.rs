// SPDX-License-Identifier: MIT

//! Responses the daemon sends back to the CLI.

use secauto_core::{Job, Node, Schedule};
use serde::{Deserialize, Serialize};

/// Per-status job counts, as returned by `JobStats`/`ScheduleStats`.
pub type StatusCounts = std::collections::BTreeMap<String, u64>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatsSummary {
    pub counts_by_status: StatusCounts,
    pub avg_duration_ms: Option<f64>,
    pub recent: Vec<Job>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleStatsSummary {
    pub counts_by_status: StatusCounts,
    pub total_runs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterInfoSummary {
    pub cluster: String,
    pub this_node: Node,
    pub peers: Vec<Node>,
    pub queue_size: u64,
}

/// Outcome of a `CancelJob` request, mirroring `secauto_engine::CancelOutcome`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    AlreadyTerminal,
}

/// Response from daemon to CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Ok,
    Pong,
    Hello { version: String },
    ShuttingDown,
    Error { message: String },

    JobSubmitted { job_id: String },
    Job { job: Option<Box<Job>> },
    Jobs { jobs: Vec<Job> },
    JobCancelled { outcome: CancelOutcome },
    JobStats { stats: JobStatsSummary },

    Schedule { schedule: Option<Box<Schedule>> },
    Schedules { schedules: Vec<Schedule> },
    ScheduleStats { stats: ScheduleStatsSummary },
    ScheduleDeleted,

    ClusterInfo { info: ClusterInfoSummary },

    Status { uptime_secs: u64, node_id: String, cluster: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
