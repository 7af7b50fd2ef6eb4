use chrono::Utc;
use secauto_core::{Job, Node};
use serde_json::json;

use super::*;

fn job(now: chrono::DateTime<Utc>) -> Job {
    Job::builder().playbook(vec![]).context(json!({})).now(now).build()
}

#[tokio::test]
async fn round_trips_a_job() {
    let store = FakeStore::new();
    let job = job(Utc::now());

    store.save_job(&job).await.expect("save");
    let loaded = store.load_job(&job.id).await.expect("load").expect("present");

    assert_eq!(loaded.id, job.id);
}

#[tokio::test]
async fn missing_job_loads_as_none() {
    let store = FakeStore::new();
    let missing = secauto_core::JobId::new();

    assert!(store.load_job(&missing).await.expect("load").is_none());
}

#[tokio::test]
async fn update_job_status_on_unknown_job_fails() {
    let store = FakeStore::new();
    let missing = secauto_core::JobId::new();

    let err = store.update_job_status(&missing, JobStatus::Running).await.unwrap_err();
    assert!(matches!(err, StoreError::JobNotFound(id) if id == missing));
}

#[tokio::test]
async fn list_jobs_filters_by_status_and_respects_limit() {
    let store = FakeStore::new();
    let now = Utc::now();

    let mut running = job(now);
    running.mark_running("node-a", now);
    store.save_job(&running).await.expect("save");

    for _ in 0..3 {
        store.save_job(&job(now)).await.expect("save");
    }

    let pending = store.list_jobs(Some(JobStatus::Pending), 2).await.expect("list");
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|job| job.status == JobStatus::Pending));

    let running_only = store.list_jobs(Some(JobStatus::Running), 10).await.expect("list");
    assert_eq!(running_only.len(), 1);
}

#[tokio::test]
async fn delete_job_removes_it() {
    let store = FakeStore::new();
    let job = job(Utc::now());
    store.save_job(&job).await.expect("save");

    store.delete_job(&job.id).await.expect("delete");
    assert!(store.load_job(&job.id).await.expect("load").is_none());
}

#[tokio::test]
async fn node_registration_is_scoped_per_cluster() {
    let store = FakeStore::new();
    let now = Utc::now();
    let node = Node::new("10.0.0.1", 9000, 4, now);

    store.register_node("blue", &node, 30).await.expect("register");

    assert_eq!(store.list_nodes("blue").await.expect("list").len(), 1);
    assert!(store.list_nodes("green").await.expect("list").is_empty());

    store.deregister_node("blue", &node.id).await.expect("deregister");
    assert!(store.list_nodes("blue").await.expect("list").is_empty());
}

#[tokio::test]
async fn cleanup_evicts_only_jobs_older_than_max_age() {
    let store = FakeStore::new();
    let now = Utc::now();
    let stale = job(now - chrono::Duration::days(2));
    let fresh = job(now);

    store.save_job(&stale).await.expect("save");
    store.save_job(&fresh).await.expect("save");

    let evicted = store.cleanup(std::time::Duration::from_secs(3600)).await.expect("cleanup");

    assert_eq!(evicted, 1);
    assert!(store.load_job(&stale.id).await.expect("load").is_none());
    assert!(store.load_job(&fresh.id).await.expect("load").is_some());
}

#[tokio::test]
async fn metrics_reflect_stored_counts() {
    let store = FakeStore::new();
    store.save_job(&job(Utc::now())).await.expect("save");

    let metrics = store.metrics().await.expect("metrics");
    assert_eq!(metrics.job_count, 1);
    assert_eq!(metrics.schedule_count, 0);
}

#[tokio::test]
async fn backup_snapshots_all_jobs() {
    let store = FakeStore::new();
    store.save_job(&job(Utc::now())).await.expect("save");
    store.save_job(&job(Utc::now())).await.expect("save");

    let backup = store.backup().await.expect("backup");
    assert_eq!(backup.job_count, 2);
    assert_eq!(backup.jobs.len(), 2);
}
