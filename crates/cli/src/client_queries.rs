// SPDX-License-Identifier: MIT

//! Typed query and command methods layered over [`DaemonClient::send`].

use std::collections::BTreeSet;

use secauto_core::{Job, JobStatus, Schedule, ScheduleStatus, ScheduleType};
use secauto_wire::{CancelOutcome, ClusterInfoSummary, JobStatsSummary, Query, Request, Response, ScheduleStatsSummary};
use serde_json::Value;

use super::client::{reject, ClientError, DaemonClient};

#[allow(clippy::too_many_arguments)]
pub struct ScheduleFields {
    pub name: String,
    pub description: String,
    pub schedule_type: ScheduleType,
    pub cron_expression: Option<String>,
    pub interval_seconds: Option<u64>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub max_runs: u64,
    pub playbook: Value,
    pub context: Value,
    pub priority: i64,
    pub tags: BTreeSet<String>,
}

impl DaemonClient {
    pub async fn submit_job(&self, playbook: Value, context: Value, priority: i64, tags: BTreeSet<String>) -> Result<String, ClientError> {
        let request = Request::SubmitJob { playbook, context, priority, tags };
        match self.send(&request).await? {
            Response::JobSubmitted { job_id } => Ok(job_id),
            other => reject(other),
        }
    }

    pub async fn get_job(&self, id: &str) -> Result<Option<Job>, ClientError> {
        let request = Request::Query { query: Query::GetJob { id: id.to_string() } };
        match self.send(&request).await? {
            Response::Job { job } => Ok(job.map(|b| *b)),
            other => reject(other),
        }
    }

    pub async fn list_jobs(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, ClientError> {
        let request = Request::Query { query: Query::ListJobs { status, limit } };
        match self.send(&request).await? {
            Response::Jobs { jobs } => Ok(jobs),
            other => reject(other),
        }
    }

    pub async fn cancel_job(&self, id: &str) -> Result<CancelOutcome, ClientError> {
        let request = Request::CancelJob { id: id.to_string() };
        match self.send(&request).await? {
            Response::JobCancelled { outcome } => Ok(outcome),
            other => reject(other),
        }
    }

    pub async fn job_stats(&self) -> Result<JobStatsSummary, ClientError> {
        match self.send(&Request::Query { query: Query::JobStats }).await? {
            Response::JobStats { stats } => Ok(stats),
            other => reject(other),
        }
    }

    pub async fn create_schedule(&self, fields: ScheduleFields) -> Result<Schedule, ClientError> {
        let request = Request::CreateSchedule {
            name: fields.name,
            description: fields.description,
            schedule_type: fields.schedule_type,
            cron_expression: fields.cron_expression,
            interval_seconds: fields.interval_seconds,
            start_time: fields.start_time,
            end_time: fields.end_time,
            max_runs: fields.max_runs,
            playbook: fields.playbook,
            context: fields.context,
            priority: fields.priority,
            tags: fields.tags,
        };
        match self.send(&request).await? {
            Response::Schedule { schedule: Some(schedule) } => Ok(*schedule),
            other => reject(other),
        }
    }

    pub async fn update_schedule(&self, id: &str, fields: ScheduleFields) -> Result<Schedule, ClientError> {
        let request = Request::UpdateSchedule {
            id: id.to_string(),
            name: fields.name,
            description: fields.description,
            schedule_type: fields.schedule_type,
            cron_expression: fields.cron_expression,
            interval_seconds: fields.interval_seconds,
            start_time: fields.start_time,
            end_time: fields.end_time,
            max_runs: fields.max_runs,
            playbook: fields.playbook,
            context: fields.context,
            priority: fields.priority,
            tags: fields.tags,
        };
        match self.send(&request).await? {
            Response::Schedule { schedule: Some(schedule) } => Ok(*schedule),
            other => reject(other),
        }
    }

    pub async fn delete_schedule(&self, id: &str) -> Result<(), ClientError> {
        match self.send(&Request::DeleteSchedule { id: id.to_string() }).await? {
            Response::ScheduleDeleted => Ok(()),
            other => reject(other),
        }
    }

    pub async fn pause_schedule(&self, id: &str) -> Result<Schedule, ClientError> {
        match self.send(&Request::PauseSchedule { id: id.to_string() }).await? {
            Response::Schedule { schedule: Some(schedule) } => Ok(*schedule),
            other => reject(other),
        }
    }

    pub async fn resume_schedule(&self, id: &str) -> Result<Schedule, ClientError> {
        match self.send(&Request::ResumeSchedule { id: id.to_string() }).await? {
            Response::Schedule { schedule: Some(schedule) } => Ok(*schedule),
            other => reject(other),
        }
    }

    pub async fn get_schedule(&self, id: &str) -> Result<Option<Schedule>, ClientError> {
        let request = Request::Query { query: Query::GetSchedule { id: id.to_string() } };
        match self.send(&request).await? {
            Response::Schedule { schedule } => Ok(schedule.map(|b| *b)),
            other => reject(other),
        }
    }

    pub async fn list_schedules(&self, status: Option<ScheduleStatus>, limit: usize) -> Result<Vec<Schedule>, ClientError> {
        let request = Request::Query { query: Query::ListSchedules { status, limit } };
        match self.send(&request).await? {
            Response::Schedules { schedules } => Ok(schedules),
            other => reject(other),
        }
    }

    pub async fn schedule_stats(&self) -> Result<ScheduleStatsSummary, ClientError> {
        match self.send(&Request::Query { query: Query::ScheduleStats }).await? {
            Response::ScheduleStats { stats } => Ok(stats),
            other => reject(other),
        }
    }

    pub async fn cluster_info(&self) -> Result<ClusterInfoSummary, ClientError> {
        match self.send(&Request::Query { query: Query::ClusterInfo }).await? {
            Response::ClusterInfo { info } => Ok(info),
            other => reject(other),
        }
    }

    pub async fn status(&self) -> Result<(u64, String, String), ClientError> {
        match self.send(&Request::Query { query: Query::Status }).await? {
            Response::Status { uptime_secs, node_id, cluster } => Ok((uptime_secs, node_id, cluster)),
            other => reject(other),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => reject(other),
        }
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown | Response::Ok => Ok(()),
            other => reject(other),
        }
    }
}
