// SPDX-License-Identifier: MIT

//! IPC server: accepts connections on the daemon's Unix socket and
//! dispatches framed [`Request`]s to the wired-up subsystems.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use secauto_cluster::ClusterManager;
use secauto_core::{Config, JobId, ScheduleId, SystemClock};
use secauto_engine::JobManager;
use secauto_rules::{parse_playbook, ParseBounds};
use secauto_scheduler::{Scheduler, ScheduleRequest};
use secauto_wire::{read_request, write_response, CancelOutcome as WireCancelOutcome, ClusterInfoSummary, JobStatsSummary, Query, Request, Response, ScheduleStatsSummary};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, info, warn};

/// Shared state every accepted connection dispatches requests against.
pub struct ServerContext {
    pub job_manager: Arc<JobManager<SystemClock>>,
    pub cluster: Option<Arc<ClusterManager<SystemClock>>>,
    pub scheduler: Arc<Scheduler<SystemClock>>,
    pub start_time: Instant,
    pub node_id: String,
    pub cluster_name: String,
    pub parse_bounds: ParseBounds,
    pub shutdown_requested: AtomicBool,
}

impl ServerContext {
    pub fn parse_bounds_from(config: &Config) -> ParseBounds {
        ParseBounds { max_nesting_depth: config.max_nesting_depth, max_conditions_per_rule: config.max_conditions_per_rule }
    }
}

/// Accepts connections on `socket_path` until `ctx.shutdown_requested` is
/// observed true between accepts. Each connection is handled to
/// completion (it carries exactly one request/response exchange) on its
/// own task.
pub async fn serve(listener: UnixListener, ctx: Arc<ServerContext>) {
    loop {
        if ctx.shutdown_requested.load(Ordering::Relaxed) {
            break;
        }
        let (stream, _addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                warn!(error = %err, "accept failed");
                continue;
            }
        };
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, &ctx).await {
                debug!(error = %err, "connection closed with error");
            }
        });
    }
}

async fn handle_connection(mut stream: UnixStream, ctx: &ServerContext) -> Result<(), secauto_wire::ProtocolError> {
    let request = read_request(&mut stream).await?;
    let response = dispatch(request, ctx).await;
    write_response(&mut stream, &response).await
}

async fn dispatch(request: Request, ctx: &ServerContext) -> Response {
    match request {
        Request::Ping => Response::Pong,
        Request::Hello { version } => {
            info!(client_version = %version, "client handshake");
            Response::Hello { version: env!("CARGO_PKG_VERSION").to_string() }
        }
        Request::Shutdown => {
            ctx.shutdown_requested.store(true, Ordering::Relaxed);
            Response::ShuttingDown
        }
        Request::Query { query } => dispatch_query(query, ctx).await,
        Request::SubmitJob { playbook, context, priority, tags } => match parse_playbook(&playbook, ctx.parse_bounds) {
            Ok(rules) => match ctx.job_manager.submit(rules, context, priority, tags).await {
                Ok(job_id) => Response::JobSubmitted { job_id: job_id.to_string() },
                Err(err) => Response::Error { message: err.to_string() },
            },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Request::CancelJob { id } => {
            let id = JobId::from_string(id);
            match ctx.job_manager.cancel(&id).await {
                Ok(secauto_engine::CancelOutcome::Cancelled) => Response::JobCancelled { outcome: WireCancelOutcome::Cancelled },
                Ok(secauto_engine::CancelOutcome::AlreadyTerminal) => Response::JobCancelled { outcome: WireCancelOutcome::AlreadyTerminal },
                Err(err) => Response::Error { message: err.to_string() },
            }
        }
        Request::CreateSchedule { name, description, schedule_type, cron_expression, interval_seconds, start_time, end_time, max_runs, playbook, context, priority, tags } => {
            match parse_playbook(&playbook, ctx.parse_bounds) {
                Ok(rules) => {
                    let req = ScheduleRequest { name, description, schedule_type, cron_expression, interval_seconds, start_time, end_time, max_runs, playbook: rules, context, priority, tags };
                    match ctx.scheduler.create(req).await {
                        Ok(schedule) => Response::Schedule { schedule: Some(Box::new(schedule)) },
                        Err(err) => Response::Error { message: err.to_string() },
                    }
                }
                Err(err) => Response::Error { message: err.to_string() },
            }
        }
        Request::UpdateSchedule { id, name, description, schedule_type, cron_expression, interval_seconds, start_time, end_time, max_runs, playbook, context, priority, tags } => {
            match parse_playbook(&playbook, ctx.parse_bounds) {
                Ok(rules) => {
                    let req = ScheduleRequest { name, description, schedule_type, cron_expression, interval_seconds, start_time, end_time, max_runs, playbook: rules, context, priority, tags };
                    match ctx.scheduler.update(&ScheduleId::from_string(id), req).await {
                        Ok(schedule) => Response::Schedule { schedule: Some(Box::new(schedule)) },
                        Err(err) => Response::Error { message: err.to_string() },
                    }
                }
                Err(err) => Response::Error { message: err.to_string() },
            }
        }
        Request::DeleteSchedule { id } => match ctx.scheduler.delete(&ScheduleId::from_string(id)).await {
            Ok(()) => Response::ScheduleDeleted,
            Err(err) => Response::Error { message: err.to_string() },
        },
        Request::PauseSchedule { id } => match ctx.scheduler.pause(&ScheduleId::from_string(id)).await {
            Ok(schedule) => Response::Schedule { schedule: Some(Box::new(schedule)) },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Request::ResumeSchedule { id } => match ctx.scheduler.resume(&ScheduleId::from_string(id)).await {
            Ok(schedule) => Response::Schedule { schedule: Some(Box::new(schedule)) },
            Err(err) => Response::Error { message: err.to_string() },
        },
    }
}

async fn dispatch_query(query: Query, ctx: &ServerContext) -> Response {
    match query {
        Query::GetJob { id } => match ctx.job_manager.get(&JobId::from_string(id)).await {
            Ok(job) => Response::Job { job: Some(Box::new(job)) },
            Err(secauto_engine::EngineError::JobNotFound(_)) => Response::Job { job: None },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::ListJobs { status, limit } => match ctx.job_manager.list(status, limit).await {
            Ok(jobs) => Response::Jobs { jobs },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::JobStats => match ctx.job_manager.stats().await {
            Ok(stats) => {
                let counts_by_status = stats.counts_by_status.into_iter().map(|(status, n)| (status.to_string(), n)).collect();
                Response::JobStats { stats: JobStatsSummary { counts_by_status, avg_duration_ms: stats.avg_duration_ms, recent: stats.recent } }
            }
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::GetSchedule { id } => match ctx.scheduler.get(&ScheduleId::from_string(id)).await {
            Ok(schedule) => Response::Schedule { schedule: Some(Box::new(schedule)) },
            Err(secauto_scheduler::SchedulerError::NotFound(_)) => Response::Schedule { schedule: None },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::ListSchedules { status, limit } => match ctx.scheduler.list(status, limit).await {
            Ok(schedules) => Response::Schedules { schedules },
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::ScheduleStats => match ctx.scheduler.stats().await {
            Ok(stats) => {
                let counts_by_status = stats.counts_by_status.into_iter().map(|(status, n)| (status.to_string(), n)).collect();
                Response::ScheduleStats { stats: ScheduleStatsSummary { counts_by_status, total_runs: stats.total_runs } }
            }
            Err(err) => Response::Error { message: err.to_string() },
        },
        Query::ClusterInfo => match &ctx.cluster {
            Some(cluster) => match cluster.info().await {
                Ok(info) => Response::ClusterInfo { info: ClusterInfoSummary { cluster: info.cluster, this_node: info.this_node, peers: info.peers, queue_size: info.queue_size } },
                Err(err) => Response::Error { message: err.to_string() },
            },
            None => Response::Error { message: "this node is not running in clustered mode".to_string() },
        },
        Query::Status => Response::Status {
            uptime_secs: ctx.start_time.elapsed().as_secs(),
            node_id: ctx.node_id.clone(),
            cluster: ctx.cluster_name.clone(),
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
