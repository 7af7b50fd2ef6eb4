// SPDX-License-Identifier: MIT

//! The Scheduler: cron/interval/once/recurring registration and firing
//! (§4.6).
//!
//! Registration never writes an engine-internal handle back onto
//! `Schedule::id` — the bug this system's source had, where the cron
//! library's own entry id overwrote the schedule's lookup identity. The
//! parsed [`cron::Schedule`] for `cron`-typed schedules lives only in
//! this process's in-memory cache, keyed by the stable [`ScheduleId`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secauto_adapters::{WebhookEmitter, WebhookEvent, WebhookEventType};
use secauto_core::{Clock, Rule, Schedule, ScheduleId, ScheduleStatus, ScheduleType, SystemClock};
use secauto_engine::JobSubmitter;
use secauto_store::Store;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::SchedulerError;

const FIRE_POLL_INTERVAL: Duration = Duration::from_secs(1);
const FIRE_SCAN_LIMIT: usize = 10_000;

/// Fields accepted by [`Scheduler::create`] and [`Scheduler::update`].
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub name: String,
    pub description: String,
    pub schedule_type: ScheduleType,
    pub cron_expression: Option<String>,
    pub interval_seconds: Option<u64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_runs: u64,
    pub playbook: Vec<Rule>,
    pub context: Value,
    pub priority: i64,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    pub counts_by_status: BTreeMap<ScheduleStatus, u64>,
    pub total_runs: u64,
}

pub struct Scheduler<C: Clock = SystemClock> {
    store: Arc<dyn Store>,
    submitter: Arc<dyn JobSubmitter>,
    webhooks: Arc<dyn WebhookEmitter>,
    clock: C,
    cron_cache: parking_lot::RwLock<HashMap<ScheduleId, cron::Schedule>>,
    cleanup_interval: Duration,
    shutdown: CancellationToken,
}

impl<C: Clock + 'static> Scheduler<C> {
    pub fn new(store: Arc<dyn Store>, submitter: Arc<dyn JobSubmitter>, webhooks: Arc<dyn WebhookEmitter>, clock: C, config: &secauto_core::Config) -> Self {
        Self {
            store,
            submitter,
            webhooks,
            clock,
            cron_cache: parking_lot::RwLock::new(HashMap::new()),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_secs.max(1)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn(self: &Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        vec![self.clone().spawn_fire_loop(), self.clone().spawn_cleanup_loop()]
    }

    pub async fn create(&self, req: ScheduleRequest) -> Result<Schedule, SchedulerError> {
        let now = self.clock.now_utc();
        validate(&req, now)?;
        let cron_schedule = parse_cron_if_needed(&req)?;
        let next_run = self.compute_next_run(&req, now, cron_schedule.as_ref());

        let schedule = Schedule {
            id: ScheduleId::new(),
            name: req.name,
            description: req.description,
            schedule_type: req.schedule_type,
            cron_expression: req.cron_expression,
            interval_seconds: req.interval_seconds,
            start_time: req.start_time,
            end_time: req.end_time,
            max_runs: req.max_runs,
            status: ScheduleStatus::Active,
            playbook: req.playbook,
            context: req.context,
            priority: req.priority,
            tags: req.tags,
            created_at: now,
            updated_at: now,
            run_count: 0,
            last_run: None,
            next_run,
        };

        if let Some(parsed) = cron_schedule {
            self.cron_cache.write().insert(schedule.id, parsed);
        }
        self.store.save_schedule(&schedule).await?;
        self.webhooks
            .emit(WebhookEvent::new(WebhookEventType::ScheduleCreated, now).with_status(schedule.status.to_string()))
            .await;
        Ok(schedule)
    }

    pub async fn update(&self, id: &ScheduleId, req: ScheduleRequest) -> Result<Schedule, SchedulerError> {
        let now = self.clock.now_utc();
        let mut schedule = self.store.load_schedule(id).await?.ok_or(SchedulerError::NotFound(*id))?;
        validate(&req, now)?;
        let cron_schedule = parse_cron_if_needed(&req)?;
        let next_run = self.compute_next_run(&req, now, cron_schedule.as_ref());

        schedule.name = req.name;
        schedule.description = req.description;
        schedule.schedule_type = req.schedule_type;
        schedule.cron_expression = req.cron_expression;
        schedule.interval_seconds = req.interval_seconds;
        schedule.start_time = req.start_time;
        schedule.end_time = req.end_time;
        schedule.max_runs = req.max_runs;
        schedule.playbook = req.playbook;
        schedule.context = req.context;
        schedule.priority = req.priority;
        schedule.tags = req.tags;
        schedule.next_run = next_run;
        schedule.updated_at = now;

        match cron_schedule {
            Some(parsed) => {
                self.cron_cache.write().insert(*id, parsed);
            }
            None => {
                self.cron_cache.write().remove(id);
            }
        }
        self.store.save_schedule(&schedule).await?;
        self.webhooks
            .emit(WebhookEvent::new(WebhookEventType::ScheduleUpdated, now).with_status(schedule.status.to_string()))
            .await;
        Ok(schedule)
    }

    pub async fn delete(&self, id: &ScheduleId) -> Result<(), SchedulerError> {
        let now = self.clock.now_utc();
        let mut schedule = self.store.load_schedule(id).await?.ok_or(SchedulerError::NotFound(*id))?;
        schedule.status = ScheduleStatus::Deleted;
        schedule.next_run = None;
        schedule.updated_at = now;
        self.cron_cache.write().remove(id);
        self.store.save_schedule(&schedule).await?;
        self.webhooks
            .emit(WebhookEvent::new(WebhookEventType::ScheduleDeleted, now).with_status(schedule.status.to_string()))
            .await;
        Ok(())
    }

    pub async fn pause(&self, id: &ScheduleId) -> Result<Schedule, SchedulerError> {
        let now = self.clock.now_utc();
        let mut schedule = self.store.load_schedule(id).await?.ok_or(SchedulerError::NotFound(*id))?;
        schedule.status = ScheduleStatus::Paused;
        schedule.updated_at = now;
        self.store.save_schedule(&schedule).await?;
        Ok(schedule)
    }

    pub async fn resume(&self, id: &ScheduleId) -> Result<Schedule, SchedulerError> {
        let now = self.clock.now_utc();
        let mut schedule = self.store.load_schedule(id).await?.ok_or(SchedulerError::NotFound(*id))?;
        schedule.status = ScheduleStatus::Active;
        if schedule.next_run.is_none() {
            let cache = self.cron_cache.read();
            schedule.next_run = next_run_for(&schedule, now, cache.get(id));
        }
        schedule.updated_at = now;
        self.store.save_schedule(&schedule).await?;
        Ok(schedule)
    }

    pub async fn get(&self, id: &ScheduleId) -> Result<Schedule, SchedulerError> {
        self.store.load_schedule(id).await?.ok_or(SchedulerError::NotFound(*id))
    }

    pub async fn list(&self, status: Option<ScheduleStatus>, limit: usize) -> Result<Vec<Schedule>, SchedulerError> {
        Ok(self.store.list_schedules(status, limit).await?)
    }

    pub async fn stats(&self) -> Result<SchedulerStats, SchedulerError> {
        let schedules = self.store.list_schedules(None, FIRE_SCAN_LIMIT).await?;
        let mut counts_by_status = BTreeMap::new();
        let mut total_runs = 0;
        for schedule in &schedules {
            *counts_by_status.entry(schedule.status).or_insert(0) += 1;
            total_runs += schedule.run_count;
        }
        Ok(SchedulerStats { counts_by_status, total_runs })
    }

    fn compute_next_run(&self, req: &ScheduleRequest, now: DateTime<Utc>, cron_schedule: Option<&cron::Schedule>) -> Option<DateTime<Utc>> {
        match req.schedule_type {
            ScheduleType::Cron => cron_schedule.and_then(|s| s.after(&now).next()),
            ScheduleType::Interval | ScheduleType::Recurring => req.interval_seconds.map(|secs| now + chrono::Duration::seconds(secs as i64)),
            ScheduleType::Once => req.start_time,
        }
    }

    fn spawn_fire_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FIRE_POLL_INTERVAL);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = ticker.tick() => self.fire_due().await,
                }
            }
        })
    }

    fn spawn_cleanup_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.cleanup_interval);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = ticker.tick() => self.expire_stale().await,
                }
            }
        })
    }

    async fn fire_due(&self) {
        let now = self.clock.now_utc();
        let due = match self.store.list_schedules(Some(ScheduleStatus::Active), FIRE_SCAN_LIMIT).await {
            Ok(schedules) => schedules,
            Err(err) => {
                warn!(error = %err, "failed to list schedules for firing");
                return;
            }
        };
        for mut schedule in due {
            if !schedule.next_run.is_some_and(|next| next <= now) {
                continue;
            }
            if schedule.has_exhausted_runs() {
                schedule.expire(now);
                self.persist(&schedule).await;
                continue;
            }
            if schedule.has_passed_end_time(now) {
                schedule.expire(now);
                self.persist(&schedule).await;
                continue;
            }

            match self
                .submitter
                .submit(schedule.playbook.clone(), schedule.context.clone(), schedule.priority, schedule.tags.clone())
                .await
            {
                Ok(job_id) => {
                    info!(schedule_id = %schedule.id, %job_id, "schedule fired");
                    let next = {
                        let cache = self.cron_cache.read();
                        next_run_for(&schedule, now, cache.get(&schedule.id))
                    };
                    schedule.record_fire(now, next);
                    if next.is_none() {
                        schedule.expire(now);
                    }
                    self.persist(&schedule).await;
                }
                Err(err) => warn!(schedule_id = %schedule.id, error = %err, "schedule submission failed"),
            }
        }
    }

    async fn expire_stale(&self) {
        let now = self.clock.now_utc();
        let active = match self.store.list_schedules(Some(ScheduleStatus::Active), FIRE_SCAN_LIMIT).await {
            Ok(schedules) => schedules,
            Err(err) => {
                warn!(error = %err, "failed to list schedules for cleanup");
                return;
            }
        };
        for mut schedule in active {
            if schedule.has_exhausted_runs() || schedule.has_passed_end_time(now) {
                schedule.expire(now);
                self.persist(&schedule).await;
            }
        }
    }

    async fn persist(&self, schedule: &Schedule) {
        if let Err(err) = self.store.save_schedule(schedule).await {
            warn!(schedule_id = %schedule.id, error = %err, "failed to persist schedule");
        }
    }
}

fn next_run_for(schedule: &Schedule, now: DateTime<Utc>, cron_schedule: Option<&cron::Schedule>) -> Option<DateTime<Utc>> {
    match schedule.schedule_type {
        ScheduleType::Cron => cron_schedule.and_then(|s| s.after(&now).next()),
        ScheduleType::Interval | ScheduleType::Recurring => schedule.interval_seconds.map(|secs| now + chrono::Duration::seconds(secs as i64)),
        ScheduleType::Once => None,
    }
}

fn parse_cron_if_needed(req: &ScheduleRequest) -> Result<Option<cron::Schedule>, SchedulerError> {
    match req.schedule_type {
        ScheduleType::Cron => {
            let expr = req.cron_expression.as_deref().ok_or_else(|| SchedulerError::Validation("cron schedules require cron_expression".to_string()))?;
            Ok(Some(cron::Schedule::from_str(expr)?))
        }
        _ => Ok(None),
    }
}

fn validate(req: &ScheduleRequest, now: DateTime<Utc>) -> Result<(), SchedulerError> {
    if req.name.trim().is_empty() {
        return Err(SchedulerError::Validation("name must not be empty".to_string()));
    }
    if req.playbook.is_empty() {
        return Err(SchedulerError::Validation("playbook must not be empty".to_string()));
    }
    match req.schedule_type {
        ScheduleType::Cron => {
            if req.cron_expression.is_none() {
                return Err(SchedulerError::Validation("cron schedules require cron_expression".to_string()));
            }
        }
        ScheduleType::Interval | ScheduleType::Recurring => {
            if !req.interval_seconds.is_some_and(|secs| secs > 0) {
                return Err(SchedulerError::Validation("interval schedules require interval_seconds > 0".to_string()));
            }
        }
        ScheduleType::Once => {
            let start = req.start_time.ok_or_else(|| SchedulerError::Validation("once schedules require start_time".to_string()))?;
            if start < now {
                return Err(SchedulerError::Validation("once.start_time must not be in the past".to_string()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
