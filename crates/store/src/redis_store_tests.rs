use std::time::Duration;

use secauto_core::{Job, JobStatus};
use serde_json::json;
use serial_test::serial;

use super::*;

/// Requires a live Redis reachable at `REDIS_URL` (defaults to
/// `redis://127.0.0.1:6379`); run with `cargo test -- --ignored` against a
/// throwaway instance. Mirrors the `apalis-redis` storage test setup.
async fn connect() -> RedisStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    RedisStore::connect(&url, Duration::from_secs(3600)).await.expect("connect to Redis")
}

#[tokio::test]
#[ignore = "requires a live Redis instance"]
#[serial]
async fn save_then_load_round_trips_a_job() {
    let store = connect().await;
    let job = Job::builder().build();
    store.save_job(&job).await.unwrap();

    let loaded = store.load_job(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.id, job.id);

    store.delete_job(&job.id).await.unwrap();
    assert!(store.load_job(&job.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a live Redis instance"]
#[serial]
async fn list_jobs_is_newest_first_and_respects_limit() {
    let store = connect().await;
    let mut first = Job::builder().build();
    first.submitted_at = chrono::Utc::now() - chrono::Duration::seconds(10);
    let second = Job::builder().build();
    store.save_job(&first).await.unwrap();
    store.save_job(&second).await.unwrap();

    let jobs = store.list_jobs(None, 1).await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, second.id);

    store.delete_job(&first.id).await.unwrap();
    store.delete_job(&second.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Redis instance"]
#[serial]
async fn update_job_context_persists_the_new_context() {
    let store = connect().await;
    let job = Job::builder().build();
    store.save_job(&job).await.unwrap();

    store.update_job_context(&job.id, json!({"k": "v"})).await.unwrap();
    let loaded = store.load_job(&job.id).await.unwrap().unwrap();
    assert_eq!(loaded.context, json!({"k": "v"}));
    assert_eq!(loaded.status, JobStatus::Pending);

    store.delete_job(&job.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live Redis instance"]
#[serial]
async fn register_and_list_nodes_round_trips() {
    let store = connect().await;
    let node = secauto_core::Node::new("127.0.0.1", 7337, 8, chrono::Utc::now());
    store.register_node("test-cluster", &node, 60).await.unwrap();

    let nodes = store.list_nodes("test-cluster").await.unwrap();
    assert!(nodes.iter().any(|n| n.id == node.id));

    store.deregister_node("test-cluster", &node.id).await.unwrap();
}
