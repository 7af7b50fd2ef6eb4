use std::collections::BTreeSet;
use std::sync::Arc;

use secauto_adapters::{MockExecutor, NullWebhookEmitter};
use secauto_core::{Clock, Config, FakeClock, Rule, ScheduleStatus, ScheduleType};
use secauto_engine::JobManager;
use secauto_rules::{Engine as RulesEngine, PlaybookSource};
use secauto_store::{FakeStore, Store};
use serde_json::json;

use super::{Scheduler, ScheduleRequest};

struct NoPlaybooks;

#[async_trait::async_trait]
impl PlaybookSource for NoPlaybooks {
    async fn load(&self, _name: &str) -> Option<Vec<Rule>> {
        None
    }
}

fn test_scheduler(clock: FakeClock) -> (Arc<Scheduler<FakeClock>>, Arc<dyn Store>) {
    let store: Arc<dyn Store> = Arc::new(FakeStore::new());
    let executor = Arc::new(MockExecutor::new().with_response("tick", Default::default()));
    let rules = Arc::new(RulesEngine::new(executor.clone(), executor, Arc::new(NoPlaybooks), &Config::default()));
    let webhooks = Arc::new(NullWebhookEmitter);
    let submitter = Arc::new(JobManager::new(store.clone(), rules, webhooks.clone(), clock.clone(), "node-a", &Config::default()));
    let scheduler = Arc::new(Scheduler::new(store.clone(), submitter, webhooks, clock, &Config::default()));
    (scheduler, store)
}

fn playbook() -> Vec<Rule> {
    vec![Rule::Run { name: "tick".to_string(), params: Default::default() }]
}

fn interval_request(interval_seconds: u64, max_runs: u64) -> ScheduleRequest {
    ScheduleRequest {
        name: "every-tick".to_string(),
        description: String::new(),
        schedule_type: ScheduleType::Interval,
        cron_expression: None,
        interval_seconds: Some(interval_seconds),
        start_time: None,
        end_time: None,
        max_runs,
        playbook: playbook(),
        context: json!({}),
        priority: 0,
        tags: BTreeSet::new(),
    }
}

#[tokio::test]
async fn create_rejects_empty_playbook() {
    let (scheduler, _store) = test_scheduler(FakeClock::new());
    let mut req = interval_request(1, 0);
    req.playbook = Vec::new();
    let result = scheduler.create(req).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn create_rejects_once_schedule_in_the_past() {
    let clock = FakeClock::new();
    let (scheduler, _store) = test_scheduler(clock.clone());
    let mut req = interval_request(1, 0);
    req.schedule_type = ScheduleType::Once;
    req.interval_seconds = None;
    req.start_time = Some(clock.now_utc() - chrono::Duration::seconds(1));
    let result = scheduler.create(req).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn create_accepts_once_schedule_in_the_future() {
    let clock = FakeClock::new();
    let (scheduler, _store) = test_scheduler(clock.clone());
    let mut req = interval_request(1, 0);
    req.schedule_type = ScheduleType::Once;
    req.interval_seconds = None;
    req.start_time = Some(clock.now_utc() + chrono::Duration::seconds(1));
    let schedule = scheduler.create(req).await.unwrap();
    assert_eq!(schedule.status, ScheduleStatus::Active);
}

#[tokio::test]
async fn created_schedule_id_is_never_overwritten_by_the_cron_cache() {
    let clock = FakeClock::new();
    let (scheduler, _store) = test_scheduler(clock);
    let mut req = interval_request(60, 0);
    req.schedule_type = ScheduleType::Cron;
    req.interval_seconds = None;
    req.cron_expression = Some("0 * * * * *".to_string());
    let schedule = scheduler.create(req).await.unwrap();
    let reloaded = scheduler.get(&schedule.id).await.unwrap();
    assert_eq!(reloaded.id, schedule.id);
}

#[tokio::test]
async fn pause_and_resume_round_trip_status() {
    let (scheduler, _store) = test_scheduler(FakeClock::new());
    let schedule = scheduler.create(interval_request(1, 0)).await.unwrap();
    let paused = scheduler.pause(&schedule.id).await.unwrap();
    assert_eq!(paused.status, ScheduleStatus::Paused);
    let resumed = scheduler.resume(&schedule.id).await.unwrap();
    assert_eq!(resumed.status, ScheduleStatus::Active);
}

#[tokio::test]
async fn delete_marks_schedule_deleted_and_clears_next_run() {
    let (scheduler, _store) = test_scheduler(FakeClock::new());
    let schedule = scheduler.create(interval_request(1, 0)).await.unwrap();
    scheduler.delete(&schedule.id).await.unwrap();
    let reloaded = scheduler.get(&schedule.id).await.unwrap();
    assert_eq!(reloaded.status, ScheduleStatus::Deleted);
    assert!(reloaded.next_run.is_none());
}

/// Matches the "schedule firing" scenario: an interval schedule with
/// `max_runs = 3` submits three jobs within ~3.x seconds and then expires.
/// The fire loop polls on a real one-second ticker (not the test's
/// `FakeClock`), so this test advances the clock in step with real sleeps
/// rather than relying on `tokio::time::pause`.
#[tokio::test]
async fn interval_schedule_fires_and_expires_after_max_runs() {
    let clock = FakeClock::new();
    let (scheduler, store) = test_scheduler(clock.clone());
    let schedule = scheduler.create(interval_request(1, 3)).await.unwrap();
    let handles = scheduler.spawn();

    for _ in 0..4 {
        clock.advance(std::time::Duration::from_secs(1));
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    }

    let reloaded = store.load_schedule(&schedule.id).await.unwrap().unwrap();
    assert_eq!(reloaded.run_count, 3);
    assert_eq!(reloaded.status, ScheduleStatus::Expired);
    assert!(reloaded.next_run.is_none());

    for handle in handles {
        handle.abort();
    }
}
