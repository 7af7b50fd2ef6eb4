use super::*;

fn schedule(max_runs: u64, run_count: u64) -> Schedule {
    let now = Utc::now();
    Schedule {
        id: ScheduleId::new(),
        name: "nightly".into(),
        description: String::new(),
        schedule_type: ScheduleType::Interval,
        cron_expression: None,
        interval_seconds: Some(1),
        start_time: None,
        end_time: None,
        max_runs,
        status: ScheduleStatus::Active,
        playbook: vec![],
        context: Value::Object(Default::default()),
        priority: 0,
        tags: BTreeSet::new(),
        created_at: now,
        updated_at: now,
        run_count,
        last_run: None,
        next_run: Some(now),
    }
}

#[test]
fn exhausted_runs_when_run_count_reaches_max() {
    assert!(!schedule(3, 2).has_exhausted_runs());
    assert!(schedule(3, 3).has_exhausted_runs());
    assert!(!schedule(0, 100).has_exhausted_runs(), "max_runs = 0 means unbounded");
}

#[test]
fn record_fire_increments_count_and_sets_last_run() {
    let mut s = schedule(3, 0);
    let t = Utc::now();
    let next = t + chrono::Duration::seconds(1);
    s.record_fire(t, Some(next));
    assert_eq!(s.run_count, 1);
    assert_eq!(s.last_run, Some(t));
    assert_eq!(s.next_run, Some(next));
}

#[test]
fn expire_clears_next_run_and_sets_status() {
    let mut s = schedule(3, 3);
    s.expire(Utc::now());
    assert_eq!(s.status, ScheduleStatus::Expired);
    assert!(s.next_run.is_none());
}

#[test]
fn expired_and_deleted_schedules_are_never_due() {
    let mut s = schedule(0, 0);
    s.status = ScheduleStatus::Expired;
    assert!(!s.is_due_for_firing());
    s.status = ScheduleStatus::Deleted;
    assert!(!s.is_due_for_firing());
}
