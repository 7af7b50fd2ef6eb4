// SPDX-License-Identifier: MIT

//! The `JobSubmitter` contract: anything that accepts a playbook
//! submission and hands back a job id.
//!
//! Implemented locally by [`crate::JobManager`] and, in `secauto-cluster`,
//! by the Cluster Manager (which forwards to the distributed queue
//! instead). The Scheduler depends on this trait alone so it never needs
//! to know which path — local or clustered — it is firing a due schedule
//! into.

use std::collections::BTreeSet;

use async_trait::async_trait;
use secauto_core::{JobId, Rule};
use serde_json::Value;

use crate::error::SubmitError;

#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(
        &self,
        playbook: Vec<Rule>,
        context: Value,
        priority: i64,
        tags: BTreeSet<String>,
    ) -> Result<JobId, SubmitError>;
}
