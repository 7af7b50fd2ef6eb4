// SPDX-License-Identifier: MIT

//! Lifecycle event fan-out.
//!
//! `Emit` is fire-and-forget from the caller's perspective: a failed
//! delivery is logged and swallowed, never propagated as a job/schedule
//! error. Per-webhook timeout is enforced by the HTTP client, not by the
//! caller wrapping the call in its own deadline.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secauto_core::JobId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    JobStarted,
    JobCompleted,
    JobFailed,
    JobCancelled,
    ScheduleCreated,
    ScheduleUpdated,
    ScheduleDeleted,
}

/// A single lifecycle notification. Fields outside the event type's
/// relevant subset are simply left `None` — the payload is one shape for
/// every event rather than a per-variant enum, matching the wire contract
/// external sinks expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    pub job_id: Option<JobId>,
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playbook: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

impl WebhookEvent {
    pub fn new(event_type: WebhookEventType, now: DateTime<Utc>) -> Self {
        Self {
            event_type,
            job_id: None,
            status: None,
            timestamp: now,
            playbook: None,
            context: None,
            results: None,
            error: None,
            duration_ms: None,
        }
    }

    pub fn with_job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_results(mut self, results: Vec<Value>) -> Self {
        self.results = Some(results);
        self
    }
}

#[async_trait]
pub trait WebhookEmitter: Send + Sync {
    async fn emit(&self, event: WebhookEvent);
}

/// Posts the event as a JSON body to a fixed URL. Delivery failures are
/// logged at `warn` and otherwise ignored — a dead sink must never stall
/// or fail the job/schedule path that triggered the event.
pub struct HttpWebhookEmitter {
    client: reqwest::Client,
    url: String,
}

impl HttpWebhookEmitter {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl WebhookEmitter for HttpWebhookEmitter {
    async fn emit(&self, event: WebhookEvent) {
        let result = self.client.post(&self.url).json(&event).send().await;
        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(url = %self.url, status = %response.status(), "webhook delivery rejected");
            }
            Err(err) => {
                tracing::warn!(url = %self.url, error = %err, "webhook delivery failed");
            }
            Ok(_) => {}
        }
    }
}

/// Discards every event. The default when no sink is configured.
pub struct NullWebhookEmitter;

#[async_trait]
impl WebhookEmitter for NullWebhookEmitter {
    async fn emit(&self, _event: WebhookEvent) {}
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
