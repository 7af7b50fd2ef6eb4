// SPDX-License-Identifier: MIT

//! Runtime configuration.
//!
//! One plain, immutable struct loaded once at startup: read the TOML file if
//! present, fall back to field-level defaults for anything absent, then
//! apply a handful of environment-variable overrides for
//! deployment-sensitive fields. There is deliberately no layered/hot-reload
//! merge engine here — see `DESIGN.md`'s resolution of the `mergeConfig`
//! open question.

use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_worker_pool_size() -> usize {
    8
}
fn default_job_queue_size() -> usize {
    256
}
fn default_retention_days() -> u64 {
    1
}
fn default_cleanup_interval_secs() -> u64 {
    300
}
fn default_max_concurrent_jobs() -> usize {
    64
}
fn default_heartbeat_interval_secs() -> u64 {
    10
}
fn default_election_timeout_secs() -> u64 {
    30
}
fn default_max_nesting_depth() -> u32 {
    10
}
fn default_max_conditions_per_rule() -> u32 {
    20
}
fn default_max_execution_time_secs() -> u64 {
    30
}
fn default_max_variables_per_context() -> usize {
    1000
}
fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
fn default_redis_pool_size() -> u32 {
    10
}
fn default_cluster_enabled() -> bool {
    true
}
fn default_cluster_name() -> String {
    "default".to_string()
}
fn default_node_host() -> String {
    "127.0.0.1".to_string()
}
fn default_node_port() -> u16 {
    7337
}
fn default_state_dir() -> String {
    "/var/lib/secauto".to_string()
}
fn default_socket_path() -> String {
    "/var/lib/secauto/secauto.sock".to_string()
}
fn default_lock_path() -> String {
    "/var/lib/secauto/secauto.lock".to_string()
}
fn default_playbooks_dir() -> String {
    "/etc/secauto/playbooks".to_string()
}
fn default_automations_dir() -> String {
    "/etc/secauto/automations".to_string()
}
fn default_plugins_dir() -> String {
    "/etc/secauto/plugins".to_string()
}

/// The configuration surface consumed by the core (matches the spec's
/// configuration table one field per row).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    #[serde(default = "default_job_queue_size")]
    pub job_queue_size: usize,

    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    pub failed_job_retention_days: Option<u64>,
    pub successful_job_retention_days: Option<u64>,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,

    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// Reserved, a no-op in this system — see the spec's `election_timeout`/
    /// `failover_enabled` design note. Kept so config files that set them
    /// don't fail to parse.
    #[serde(default = "default_election_timeout_secs")]
    pub election_timeout_secs: u64,
    #[serde(default)]
    pub failover_enabled: bool,

    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: u32,
    #[serde(default = "default_max_conditions_per_rule")]
    pub max_conditions_per_rule: u32,
    #[serde(default = "default_max_execution_time_secs")]
    pub max_execution_time_secs: u64,
    #[serde(default = "default_max_variables_per_context")]
    pub max_variables_per_context: usize,
    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_redis_pool_size")]
    pub redis_pool_size: u32,

    /// Whether this node registers with the cluster and participates in
    /// distributed dispatch (§4.5). When `false`, schedules and the local
    /// submission path run entirely through the in-process Job Manager.
    #[serde(default = "default_cluster_enabled")]
    pub cluster_enabled: bool,
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
    #[serde(default = "default_node_host")]
    pub node_host: String,
    #[serde(default = "default_node_port")]
    pub node_port: u16,

    /// Directory the daemon keeps its runtime files under (lock, socket,
    /// unless overridden individually).
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
    /// Unix socket the daemon listens on for CLI connections.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Exclusive lock file guarding against two daemons sharing a state dir.
    #[serde(default = "default_lock_path")]
    pub lock_path: String,
    /// Directory `Rule::Play` names are resolved against (`{dir}/{name}.json`).
    #[serde(default = "default_playbooks_dir")]
    pub playbooks_dir: String,
    /// Webhook delivery target. Absent means lifecycle events are dropped
    /// (`NullWebhookEmitter`) rather than posted anywhere.
    pub webhook_url: Option<String>,
    /// Directory `Run` rules shell out against (`{dir}/{name}`).
    #[serde(default = "default_automations_dir")]
    pub automations_dir: String,
    /// Directory `Plugin` rules shell out against (`{dir}/{name}`).
    #[serde(default = "default_plugins_dir")]
    pub plugins_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_pool_size: default_worker_pool_size(),
            job_queue_size: default_job_queue_size(),
            retention_days: default_retention_days(),
            failed_job_retention_days: None,
            successful_job_retention_days: None,
            cleanup_interval_secs: default_cleanup_interval_secs(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            election_timeout_secs: default_election_timeout_secs(),
            failover_enabled: false,
            max_nesting_depth: default_max_nesting_depth(),
            max_conditions_per_rule: default_max_conditions_per_rule(),
            max_execution_time_secs: default_max_execution_time_secs(),
            max_variables_per_context: default_max_variables_per_context(),
            strict_mode: false,
            redis_url: default_redis_url(),
            redis_pool_size: default_redis_pool_size(),
            cluster_enabled: default_cluster_enabled(),
            cluster_name: default_cluster_name(),
            node_host: default_node_host(),
            node_port: default_node_port(),
            state_dir: default_state_dir(),
            socket_path: default_socket_path(),
            lock_path: default_lock_path(),
            playbooks_dir: default_playbooks_dir(),
            webhook_url: None,
            automations_dir: default_automations_dir(),
            plugins_dir: default_plugins_dir(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("parsing config file {path}: {source}")]
    Parse { path: String, #[source] source: toml::de::Error },
}

impl Config {
    /// Load from `path` if it exists, else start from defaults. Applies
    /// `SECAUTO_REDIS_URL`, `SECAUTO_CLUSTER_NAME`, `SECAUTO_NODE_HOST`, and
    /// `SECAUTO_NODE_PORT` environment overrides afterward.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
            toml::from_str(&text)
                .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SECAUTO_REDIS_URL") {
            self.redis_url = url;
        }
        if let Ok(name) = std::env::var("SECAUTO_CLUSTER_NAME") {
            self.cluster_name = name;
        }
        if let Ok(host) = std::env::var("SECAUTO_NODE_HOST") {
            self.node_host = host;
        }
        if let Ok(port) = std::env::var("SECAUTO_NODE_PORT") {
            if let Ok(port) = port.parse() {
                self.node_port = port;
            }
        }
    }

    pub fn failed_job_retention(&self) -> u64 {
        self.failed_job_retention_days.unwrap_or(self.retention_days)
    }

    pub fn successful_job_retention(&self) -> u64 {
        self.successful_job_retention_days.unwrap_or(self.retention_days)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
