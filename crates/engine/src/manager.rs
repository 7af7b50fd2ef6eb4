// SPDX-License-Identifier: MIT

//! The Job Manager: local submission path, worker pool, and lifecycle
//! bookkeeping for the Rules Engine's `secauto-rules::Engine`.
//!
//! A bounded in-process channel (`job_queue_size`) feeds a dispatcher task
//! that gates concurrent rule evaluation with a semaphore
//! (`worker_pool_size`) rather than a fixed set of worker loops — this
//! keeps the channel receiver single-owned while still bounding
//! concurrency the way the spec's "bounded set of workers" describes.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secauto_adapters::{WebhookEmitter, WebhookEvent, WebhookEventType};
use secauto_core::{Clock, Config, Job, JobId, JobStatus, Rule, SystemClock};
use secauto_rules::Engine as RulesEngine;
use secauto_store::Store;
use serde_json::Value;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{EngineError, SubmitError};
use crate::submitter::JobSubmitter;

/// Outcome of [`JobManager::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    AlreadyTerminal,
}

#[derive(Debug, Clone, Default)]
pub struct JobStats {
    pub counts_by_status: BTreeMap<JobStatus, u64>,
    pub avg_duration_ms: Option<f64>,
    pub recent: Vec<Job>,
}

/// How many jobs `stats()` scans from the store to compute its summary.
/// Not a hard cap on retained history, just a cost bound on an advisory
/// aggregate.
const STATS_SCAN_LIMIT: usize = 1000;
const STATS_RECENT_COUNT: usize = 10;

pub struct JobManager<C: Clock = SystemClock> {
    store: Arc<dyn Store>,
    rules_engine: Arc<RulesEngine>,
    webhooks: Arc<dyn WebhookEmitter>,
    clock: C,
    node_id: String,
    worker_pool_size: usize,
    cleanup_interval: Duration,
    failed_retention: chrono::Duration,
    successful_retention: chrono::Duration,
    tx: mpsc::Sender<JobId>,
    rx: tokio::sync::Mutex<Option<mpsc::Receiver<JobId>>>,
    jobs: parking_lot::RwLock<HashMap<JobId, Job>>,
    cancels: parking_lot::RwLock<HashMap<JobId, CancellationToken>>,
    shutdown: CancellationToken,
}

impl<C: Clock + 'static> JobManager<C> {
    pub fn new(
        store: Arc<dyn Store>,
        rules_engine: Arc<RulesEngine>,
        webhooks: Arc<dyn WebhookEmitter>,
        clock: C,
        node_id: impl Into<String>,
        config: &Config,
    ) -> Self {
        let (tx, rx) = mpsc::channel(config.job_queue_size);
        Self {
            store,
            rules_engine,
            webhooks,
            clock,
            node_id: node_id.into(),
            worker_pool_size: config.worker_pool_size,
            cleanup_interval: Duration::from_secs(config.cleanup_interval_secs),
            failed_retention: chrono::Duration::days(config.failed_job_retention() as i64),
            successful_retention: chrono::Duration::days(config.successful_job_retention() as i64),
            tx,
            rx: tokio::sync::Mutex::new(Some(rx)),
            jobs: parking_lot::RwLock::new(HashMap::new()),
            cancels: parking_lot::RwLock::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Crash-recovery pass: fails any job left `running` under this node's
    /// identity by a prior process. Call once, before [`Self::spawn`].
    pub async fn recover(&self) -> Result<usize, EngineError> {
        crate::recovery::recover(&self.store, &self.webhooks, &self.clock, &self.node_id).await
    }

    /// Spawns the dispatcher task and the cleanup sweep. Returns their
    /// join handles so the caller can await orderly shutdown after
    /// cancelling the token returned by [`Self::shutdown_token`].
    pub fn spawn(self: &Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::new();
        handles.push(self.clone().spawn_dispatcher());
        handles.push(self.clone().spawn_cleanup(self.cleanup_interval));
        handles
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    fn spawn_dispatcher(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut rx = match self.rx.lock().await.take() {
                Some(rx) => rx,
                None => {
                    warn!("job manager dispatcher already running");
                    return;
                }
            };
            let semaphore = Arc::new(Semaphore::new(self.worker_pool_size.max(1)));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    job_id = rx.recv() => {
                        let Some(job_id) = job_id else { break };
                        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else { break };
                        let this = Arc::clone(&self);
                        tokio::spawn(async move {
                            this.run_job(job_id).await;
                            drop(permit);
                        });
                    }
                }
            }
        })
    }

    fn spawn_cleanup(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        if let Err(err) = crate::cleanup::sweep(&self.store, self.clock.now_utc(), self.failed_retention, self.successful_retention).await {
                            warn!(error = %err, "job cleanup sweep failed");
                        }
                    }
                }
            }
        })
    }

    async fn run_job(&self, job_id: JobId) {
        let Some(mut job) = self.jobs.read().get(&job_id).cloned() else {
            warn!(%job_id, "dispatched job missing from in-memory map");
            return;
        };
        if job.status == JobStatus::Cancelled {
            return;
        }

        let now = self.clock.now_utc();
        job.mark_running(self.node_id.clone(), now);
        if let Err(err) = self.store.save_job(&job).await {
            warn!(%job_id, error = %err, "failed to persist running job");
            return;
        }
        self.jobs.write().insert(job_id, job.clone());
        self.webhooks
            .emit(WebhookEvent::new(WebhookEventType::JobStarted, now).with_job_id(job_id).with_status(job.status.to_string()))
            .await;

        let cancel = CancellationToken::new();
        self.cancels.write().insert(job_id, cancel.clone());

        let mut ctx = job.context.clone();
        let (results, error) = self.rules_engine.evaluate(&job.playbook, &mut ctx, &cancel).await;
        self.cancels.write().remove(&job_id);

        let now = self.clock.now_utc();
        let (event_type, status_str) = if cancel.is_cancelled() {
            job.mark_cancelled(results, now);
            (WebhookEventType::JobCancelled, job.status.to_string())
        } else if let Some(err) = &error {
            job.mark_failed(err.to_string(), results, now);
            (WebhookEventType::JobFailed, job.status.to_string())
        } else {
            job.mark_completed(results, now);
            (WebhookEventType::JobCompleted, job.status.to_string())
        };
        job.context = ctx;

        if let Err(err) = self.store.save_job(&job).await {
            warn!(%job_id, error = %err, "failed to persist terminal job");
        }
        self.jobs.write().remove(&job_id);

        let duration_ms = job.started_at.and_then(|start| job.completed_at.map(|end| (end - start).num_milliseconds()));
        let mut event = WebhookEvent::new(event_type, now)
            .with_job_id(job_id)
            .with_status(status_str)
            .with_context(job.context.clone())
            .with_results(job.results.clone());
        if let Some(ms) = duration_ms {
            event = event.with_duration_ms(ms);
        }
        if let Some(err) = &job.error {
            event = event.with_error(err.clone());
        }
        self.webhooks.emit(event).await;
        info!(%job_id, status = %job.status, "job reached terminal state");
    }

    pub async fn get(&self, id: &JobId) -> Result<Job, EngineError> {
        if let Some(job) = self.jobs.read().get(id).cloned() {
            return Ok(job);
        }
        self.store.load_job(id).await?.ok_or(EngineError::JobNotFound(*id))
    }

    pub async fn list(&self, status: Option<JobStatus>, limit: usize) -> Result<Vec<Job>, EngineError> {
        Ok(self.store.list_jobs(status, limit).await?)
    }

    pub async fn cancel(&self, id: &JobId) -> Result<CancelOutcome, EngineError> {
        let snapshot = self.jobs.read().get(id).cloned();
        let mut job = match snapshot {
            Some(job) => job,
            None => self.store.load_job(id).await?.ok_or(EngineError::JobNotFound(*id))?,
        };
        if job.status.is_terminal() {
            return Ok(CancelOutcome::AlreadyTerminal);
        }

        if job.status == JobStatus::Pending {
            let now = self.clock.now_utc();
            job.mark_cancelled(job.results.clone(), now);
            self.store.save_job(&job).await?;
            self.jobs.write().remove(id);
            self.webhooks
                .emit(WebhookEvent::new(WebhookEventType::JobCancelled, now).with_job_id(*id).with_status(job.status.to_string()))
                .await;
        } else if let Some(token) = self.cancels.read().get(id) {
            // Running: flag cooperative cancellation; run_job finalizes
            // the terminal state once the engine observes it between rules.
            token.cancel();
        }
        Ok(CancelOutcome::Cancelled)
    }

    pub async fn stats(&self) -> Result<JobStats, EngineError> {
        let jobs = self.store.list_jobs(None, STATS_SCAN_LIMIT).await?;
        let mut counts_by_status = BTreeMap::new();
        let mut total_ms = 0i64;
        let mut completed = 0i64;
        for job in &jobs {
            *counts_by_status.entry(job.status).or_insert(0) += 1;
            if let (Some(start), Some(end)) = (job.started_at, job.completed_at) {
                total_ms += (end - start).num_milliseconds();
                completed += 1;
            }
        }
        let avg_duration_ms = (completed > 0).then(|| total_ms as f64 / completed as f64);
        let recent = jobs.into_iter().take(STATS_RECENT_COUNT).collect();
        Ok(JobStats { counts_by_status, avg_duration_ms, recent })
    }
}

#[async_trait]
impl<C: Clock + 'static> JobSubmitter for JobManager<C> {
    async fn submit(&self, playbook: Vec<Rule>, context: Value, priority: i64, tags: BTreeSet<String>) -> Result<JobId, SubmitError> {
        let job = Job::new(playbook, context, priority, tags, self.clock.now_utc());
        let id = job.id;
        self.store.save_job(&job).await.map_err(EngineError::from)?;
        self.jobs.write().insert(id, job);
        self.tx.try_send(id).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SubmitError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => SubmitError::ChannelClosed,
        })?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
