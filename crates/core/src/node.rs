// SPDX-License-Identifier: MIT

//! Cluster node membership data model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node identity. Unlike [`crate::define_id!`]-generated IDs, a node's
/// identity is a UUID per the data model, stable across restarts unless the
/// operator reconfigures it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Active,
    Inactive,
    Starting,
    Stopping,
}

crate::simple_display! {
    NodeStatus {
        Active => "active",
        Inactive => "inactive",
        Starting => "starting",
        Stopping => "stopping",
    }
}

/// Running-job counters maintained by a node for its own registration record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounters {
    pub running: u64,
    pub completed: u64,
    pub failed: u64,
}

/// A cluster peer's registration record, as stored at
/// `secauto:nodes:<cluster>:<node_id>`. A node is active iff this record
/// exists in Redis with a non-expired TTL — there is no separate liveness
/// check beyond the registration key itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub host: String,
    pub port: u16,
    pub status: NodeStatus,
    pub capabilities: BTreeSet<String>,
    pub started_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub counters: NodeCounters,
    /// Dispatch capacity this node advertises; `load()` divides running by this.
    pub capacity: u64,
}

impl Node {
    pub fn new(host: impl Into<String>, port: u16, capacity: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: NodeId::new(),
            host: host.into(),
            port,
            status: NodeStatus::Starting,
            capabilities: BTreeSet::new(),
            started_at: now,
            last_seen: now,
            counters: NodeCounters::default(),
            capacity: capacity.max(1),
        }
    }

    /// `load = running / capacity`, matching the heartbeat loop's `running/10` example
    /// generalized to a configurable capacity.
    pub fn load(&self) -> f64 {
        self.counters.running as f64 / self.capacity as f64
    }

    pub fn heartbeat(&mut self, now: DateTime<Utc>) {
        self.status = NodeStatus::Active;
        self.last_seen = now;
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
