// SPDX-License-Identifier: MIT

//! Crash-recovery pass, run once at startup.
//!
//! Scans the store for jobs left `running` by a prior process under this
//! node's identity and fails them outright: an interrupted execution may
//! have already had observable side effects through the `Executor`, and
//! the spec accepts that as the at-least-once boundary rather than
//! attempting to resume mid-playbook.

use std::sync::Arc;

use secauto_adapters::{WebhookEmitter, WebhookEvent, WebhookEventType};
use secauto_core::{Clock, JobStatus};
use secauto_store::Store;
use tracing::warn;

const RESTART_ERROR: &str = "Job failed due to server restart";

/// Scans for jobs `running` under `node_id`, marks each `failed`, and
/// emits a `job_failed` webhook for it. Returns the count recovered.
pub async fn recover(
    store: &Arc<dyn Store>,
    webhooks: &Arc<dyn WebhookEmitter>,
    clock: &impl Clock,
    node_id: &str,
) -> Result<usize, crate::error::EngineError> {
    let running = store.list_jobs(Some(JobStatus::Running), usize::MAX).await?;
    let mut recovered = 0;
    for mut job in running {
        if job.assigned_node.as_deref() != Some(node_id) {
            continue;
        }
        let now = clock.now_utc();
        job.mark_failed(RESTART_ERROR, job.results.clone(), now);
        if let Err(err) = store.save_job(&job).await {
            warn!(job_id = %job.id, error = %err, "failed to persist recovered job");
            continue;
        }
        webhooks
            .emit(
                WebhookEvent::new(WebhookEventType::JobFailed, now)
                    .with_job_id(job.id)
                    .with_status(job.status.to_string())
                    .with_error(RESTART_ERROR),
            )
            .await;
        recovered += 1;
    }
    Ok(recovered)
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
