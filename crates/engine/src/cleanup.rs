// SPDX-License-Identifier: MIT

//! Retention sweep: the spec stores a separate `failed_job_retention`
//! and `successful_job_retention`, which don't map onto `Store::cleanup`'s
//! single `max_age` contract, so the split lives here instead — two scans
//! against the status-filtered job index, one per retention bucket.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secauto_core::JobStatus;
use secauto_store::{Store, StoreError};
use tracing::debug;

/// Caps how many jobs of a given status the sweep inspects per pass. A
/// node that falls behind its retention window by more than this many
/// jobs catches up over several sweeps rather than one unbounded scan.
const SWEEP_SCAN_LIMIT: usize = 5000;

pub async fn sweep(
    store: &Arc<dyn Store>,
    now: DateTime<Utc>,
    failed_retention: chrono::Duration,
    successful_retention: chrono::Duration,
) -> Result<u64, StoreError> {
    let mut removed = 0;
    removed += sweep_bucket(store, now, failed_retention, &[JobStatus::Failed, JobStatus::Cancelled]).await?;
    removed += sweep_bucket(store, now, successful_retention, &[JobStatus::Completed]).await?;
    debug!(removed, "job cleanup sweep complete");
    Ok(removed)
}

async fn sweep_bucket(
    store: &Arc<dyn Store>,
    now: DateTime<Utc>,
    retention: chrono::Duration,
    statuses: &[JobStatus],
) -> Result<u64, StoreError> {
    let cutoff = now - retention;
    let mut removed = 0;
    for &status in statuses {
        let jobs = store.list_jobs(Some(status), SWEEP_SCAN_LIMIT).await?;
        for job in jobs {
            let age_anchor = job.completed_at.unwrap_or(job.submitted_at);
            if age_anchor < cutoff {
                store.delete_job(&job.id).await?;
                removed += 1;
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
