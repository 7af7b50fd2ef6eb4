use super::*;
use secauto_core::{JobId, NodeId, ScheduleId};

#[test]
fn job_key_matches_layout() {
    let id = JobId::from_string("job-abc");
    assert_eq!(job_key(&id), "job:job-abc");
}

#[test]
fn schedule_key_matches_layout() {
    let id = ScheduleId::from_string("sch-abc");
    assert_eq!(schedule_key(&id), "schedule:sch-abc");
}

#[test]
fn node_key_namespaces_by_cluster() {
    let id = NodeId::new();
    assert_eq!(node_key("prod", &id), format!("secauto:nodes:prod:{id}"));
    assert!(node_key("prod", &id).starts_with(&node_prefix("prod")));
}

#[test]
fn queue_and_dist_job_keys_namespace_by_cluster() {
    let id = JobId::from_string("job-abc");
    assert_eq!(queue_key("prod"), "secauto:jobs:prod");
    assert_eq!(dist_job_key(&id), "secauto:job:job-abc");
}

#[test]
fn backup_key_uses_timestamp() {
    assert_eq!(backup_key(1_700_000_000), "backup:1700000000");
}
