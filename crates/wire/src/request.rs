// SPDX-License-Identifier: MIT

//! Requests the CLI sends to the daemon.

use std::collections::BTreeSet;

use secauto_core::ScheduleType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Query;

/// Request from CLI to daemon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping.
    Ping,

    /// Version handshake.
    Hello { version: String },

    /// Request daemon shutdown.
    Shutdown,

    /// Query state.
    Query { query: Query },

    /// Submit a playbook for execution. `playbook` is the author-facing
    /// shorthand JSON array the rules engine parses at ingest.
    SubmitJob {
        playbook: Value,
        #[serde(default)]
        context: Value,
        #[serde(default)]
        priority: i64,
        #[serde(default)]
        tags: BTreeSet<String>,
    },

    /// Cancel a pending or running job.
    CancelJob { id: String },

    CreateSchedule {
        name: String,
        #[serde(default)]
        description: String,
        schedule_type: ScheduleType,
        #[serde(default)]
        cron_expression: Option<String>,
        #[serde(default)]
        interval_seconds: Option<u64>,
        #[serde(default)]
        start_time: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(default)]
        end_time: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(default)]
        max_runs: u64,
        playbook: Value,
        #[serde(default)]
        context: Value,
        #[serde(default)]
        priority: i64,
        #[serde(default)]
        tags: BTreeSet<String>,
    },

    UpdateSchedule {
        id: String,
        name: String,
        #[serde(default)]
        description: String,
        schedule_type: ScheduleType,
        #[serde(default)]
        cron_expression: Option<String>,
        #[serde(default)]
        interval_seconds: Option<u64>,
        #[serde(default)]
        start_time: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(default)]
        end_time: Option<chrono::DateTime<chrono::Utc>>,
        #[serde(default)]
        max_runs: u64,
        playbook: Value,
        #[serde(default)]
        context: Value,
        #[serde(default)]
        priority: i64,
        #[serde(default)]
        tags: BTreeSet<String>,
    },

    DeleteSchedule { id: String },
    PauseSchedule { id: String },
    ResumeSchedule { id: String },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
