// SPDX-License-Identifier: MIT

//! Recurring/one-shot schedule data model.
//!
//! The schedule's `id` is its permanent lookup identity and is never
//! overwritten by the underlying cron engine's own entry handle — the
//! source this system is derived from conflated the two, which made a
//! schedule's identity drift after registration. The engine-entry handle is
//! tracked separately by the scheduler's in-memory registry, never persisted
//! onto this struct. See `DESIGN.md` "Open Question Resolutions".

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rule::Rule;

crate::define_id! {
    /// Identity of a schedule. Stable for the schedule's lifetime.
    pub struct ScheduleId("sch-");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    Cron,
    Interval,
    Once,
    Recurring,
}

crate::simple_display! {
    ScheduleType {
        Cron => "cron",
        Interval => "interval",
        Once => "once",
        Recurring => "recurring",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Active,
    Paused,
    Deleted,
    Expired,
}

crate::simple_display! {
    ScheduleStatus {
        Active => "active",
        Paused => "paused",
        Deleted => "deleted",
        Expired => "expired",
    }
}

/// A declarative recurrence that produces jobs. Attributes not relevant to
/// `schedule_type` are left `None` — validated at `Create`/`Update` time by
/// the scheduler, not by this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub description: String,
    pub schedule_type: ScheduleType,

    pub cron_expression: Option<String>,
    pub interval_seconds: Option<u64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_runs: u64,

    pub status: ScheduleStatus,
    pub playbook: Vec<Rule>,
    pub context: Value,
    pub priority: i64,
    pub tags: BTreeSet<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub run_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
}

impl Schedule {
    pub fn is_due_for_firing(&self) -> bool {
        self.status == ScheduleStatus::Active
    }

    pub fn has_exhausted_runs(&self) -> bool {
        self.max_runs > 0 && self.run_count >= self.max_runs
    }

    pub fn has_passed_end_time(&self, now: DateTime<Utc>) -> bool {
        self.end_time.is_some_and(|end| end < now)
    }

    /// Record a single firing: increments `run_count`, sets `last_run`, and
    /// installs the caller-computed `next_run` (or `None` at expiry).
    pub fn record_fire(&mut self, now: DateTime<Utc>, next_run: Option<DateTime<Utc>>) {
        self.run_count += 1;
        self.last_run = Some(now);
        self.next_run = next_run;
        self.updated_at = now;
    }

    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.status = ScheduleStatus::Expired;
        self.next_run = None;
        self.updated_at = now;
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
