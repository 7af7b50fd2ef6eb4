use secauto_core::JobStatus;

use super::*;

#[test]
fn list_jobs_round_trips_through_json() {
    let query = Query::ListJobs { status: Some(JobStatus::Running), limit: 50 };
    let encoded = serde_json::to_string(&query).expect("serialize");
    let decoded: Query = serde_json::from_str(&encoded).expect("deserialize");
    assert_eq!(query, decoded);
}

#[test]
fn status_has_no_fields() {
    let encoded = serde_json::to_string(&Query::Status).expect("serialize");
    assert_eq!(encoded, r#"{"type":"Status"}"#);
}
