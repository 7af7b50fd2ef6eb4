// SPDX-License-Identifier: MIT

//! The Cluster Manager: node registration plus the heartbeat, discovery,
//! and dispatch loops that make a set of nodes share one distributed
//! queue.
//!
//! No leader election and no reassignment of a crashed peer's in-flight
//! jobs: membership is purely TTL-based, matching the spec's explicit
//! simplification (`election_timeout`/`failover_enabled` are inert
//! configuration fields, not a dormant feature this module half-builds).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secauto_adapters::{WebhookEmitter, WebhookEvent, WebhookEventType};
use secauto_core::{Clock, Config, Job, Node, NodeId, Rule, SystemClock};
use secauto_engine::{JobSubmitter, SubmitError};
use secauto_queue::DistributedQueue;
use secauto_rules::Engine as RulesEngine;
use secauto_store::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::ClusterError;

const DISPATCH_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster: String,
    pub this_node: Node,
    pub peers: Vec<Node>,
    pub queue_size: u64,
}

pub struct ClusterManager<C: Clock = SystemClock> {
    store: Arc<dyn Store>,
    queue: Arc<dyn DistributedQueue>,
    rules_engine: Arc<RulesEngine>,
    webhooks: Arc<dyn WebhookEmitter>,
    clock: C,
    cluster_name: String,
    node: parking_lot::RwLock<Node>,
    peers: parking_lot::RwLock<Vec<Node>>,
    heartbeat_interval: Duration,
    node_ttl_secs: u64,
    running_jobs: AtomicU64,
    shutdown: CancellationToken,
}

impl<C: Clock + 'static> ClusterManager<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn Store>,
        queue: Arc<dyn DistributedQueue>,
        rules_engine: Arc<RulesEngine>,
        webhooks: Arc<dyn WebhookEmitter>,
        clock: C,
        cluster_name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        capacity: u64,
        config: &Config,
    ) -> Self {
        let node = Node::new(host, port, capacity, clock.now_utc());
        Self {
            store,
            queue,
            rules_engine,
            webhooks,
            clock,
            cluster_name: cluster_name.into(),
            node: parking_lot::RwLock::new(node),
            peers: parking_lot::RwLock::new(Vec::new()),
            heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs.max(1)),
            node_ttl_secs: config.heartbeat_interval_secs.max(1) * 3,
            running_jobs: AtomicU64::new(0),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node.read().id
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Registers this node and spawns the heartbeat, discovery, and
    /// dispatch loops. Returns their join handles.
    pub async fn start(self: &Arc<Self>) -> Result<Vec<tokio::task::JoinHandle<()>>, ClusterError> {
        {
            let mut node = self.node.write();
            node.heartbeat(self.clock.now_utc());
            self.store.register_node(&self.cluster_name, &node, self.node_ttl_secs).await?;
        }
        info!(node_id = %self.node_id(), cluster = %self.cluster_name, "node registered");
        Ok(vec![self.clone().spawn_heartbeat(), self.clone().spawn_discovery(), self.clone().spawn_dispatch()])
    }

    pub async fn info(&self) -> Result<ClusterInfo, ClusterError> {
        Ok(ClusterInfo {
            cluster: self.cluster_name.clone(),
            this_node: self.node.read().clone(),
            peers: self.peers.read().clone(),
            queue_size: self.queue.size().await?,
        })
    }

    pub async fn close(&self) -> Result<(), ClusterError> {
        self.shutdown.cancel();
        let node_id = self.node_id();
        self.store.deregister_node(&self.cluster_name, &node_id).await?;
        Ok(())
    }

    fn spawn_heartbeat(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.heartbeat_interval);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let node = {
                            let mut node = self.node.write();
                            node.counters.running = self.running_jobs.load(Ordering::Relaxed);
                            node.heartbeat(self.clock.now_utc());
                            node.clone()
                        };
                        if let Err(err) = self.store.register_node(&self.cluster_name, &node, self.node_ttl_secs).await {
                            warn!(error = %err, "heartbeat registration failed");
                        }
                    }
                }
            }
        })
    }

    fn spawn_discovery(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.heartbeat_interval);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        match self.store.list_nodes(&self.cluster_name).await {
                            Ok(nodes) => *self.peers.write() = nodes,
                            Err(err) => warn!(error = %err, "peer discovery failed"),
                        }
                    }
                }
            }
        })
    }

    fn spawn_dispatch(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(DISPATCH_POLL_INTERVAL);
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        match self.queue.dequeue().await {
                            Ok(Some(job)) => {
                                self.running_jobs.fetch_add(1, Ordering::Relaxed);
                                let this = Arc::clone(&self);
                                tokio::spawn(async move {
                                    this.run_claimed(job).await;
                                    this.running_jobs.fetch_sub(1, Ordering::Relaxed);
                                });
                            }
                            Ok(None) => {}
                            Err(err) => warn!(error = %err, "dispatch dequeue failed"),
                        }
                    }
                }
            }
        })
    }

    async fn run_claimed(&self, mut job: Job) {
        let node_id = self.node_id().to_string();
        let now = self.clock.now_utc();
        job.mark_running(node_id, now);
        if let Err(err) = self.queue.update(&job).await {
            warn!(job_id = %job.id, error = %err, "failed to persist claimed job");
        }
        self.webhooks
            .emit(WebhookEvent::new(WebhookEventType::JobStarted, now).with_job_id(job.id).with_status(job.status.to_string()))
            .await;

        let cancel = CancellationToken::new();
        let mut ctx = job.context.clone();
        let (results, error) = self.rules_engine.evaluate(&job.playbook, &mut ctx, &cancel).await;
        job.context = ctx;

        let now = self.clock.now_utc();
        let event_type = if let Some(err) = &error {
            job.mark_failed(err.to_string(), results, now);
            WebhookEventType::JobFailed
        } else {
            job.mark_completed(results, now);
            WebhookEventType::JobCompleted
        };

        if let Err(err) = self.queue.update(&job).await {
            warn!(job_id = %job.id, error = %err, "failed to persist terminal job");
        }

        let mut event = WebhookEvent::new(event_type, now)
            .with_job_id(job.id)
            .with_status(job.status.to_string())
            .with_context(job.context.clone())
            .with_results(job.results.clone());
        if let Some(err) = &job.error {
            event = event.with_error(err.clone());
        }
        self.webhooks.emit(event).await;
        info!(job_id = %job.id, status = %job.status, "cluster job reached terminal state");
    }
}

#[async_trait]
impl<C: Clock + 'static> JobSubmitter for ClusterManager<C> {
    async fn submit(&self, playbook: Vec<Rule>, context: Value, priority: i64, tags: BTreeSet<String>) -> Result<secauto_core::JobId, SubmitError> {
        let job = Job::new(playbook, context, priority, tags, self.clock.now_utc());
        let id = job.id;
        self.queue.enqueue(&job).await.map_err(|err| SubmitError::Other(err.to_string()))?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
