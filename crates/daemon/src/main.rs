// SPDX-License-Identifier: MIT

//! `secautod`: wires the Store, Rules Engine, Job Manager, Cluster
//! Manager, and Scheduler together behind a local IPC listener.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use secauto_adapters::{
    FilesystemPlaybookSource, HttpWebhookEmitter, NoPlaybooks, NullWebhookEmitter, SubprocessExecutor, SubprocessPluginExecutor, WebhookEmitter,
};
use secauto_cluster::ClusterManager;
use secauto_core::{Config, SystemClock};
use secauto_daemon::server::{serve, ServerContext};
use secauto_engine::JobManager;
use secauto_queue::RedisQueue;
use secauto_rules::{Engine as RulesEngine, Executor, PlaybookSource, PluginExecutor};
use secauto_scheduler::Scheduler;
use secauto_store::{RedisStore, Store};
use tokio::net::UnixListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn config_path() -> PathBuf {
    std::env::var("SECAUTO_CONFIG").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/etc/secauto/secauto.toml"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();

    let config = Config::load(&config_path())?;
    info!(cluster = %config.cluster_name, node = %config.node_host, port = config.node_port, "starting secautod");

    std::fs::create_dir_all(&config.state_dir)?;
    let _lock = secauto_daemon::acquire(Path::new(&config.lock_path)).map_err(|err| {
        error!(error = %err, "failed to acquire startup lock");
        err
    })?;

    let store: Arc<dyn Store> = Arc::new(RedisStore::connect(&config.redis_url, job_ttl(&config)).await?);

    let webhooks: Arc<dyn WebhookEmitter> = match &config.webhook_url {
        Some(url) => Arc::new(HttpWebhookEmitter::new(url.clone())),
        None => Arc::new(NullWebhookEmitter),
    };

    let executor: Arc<dyn Executor> = Arc::new(SubprocessExecutor::new(config.automations_dir.clone()));
    let plugin_executor: Arc<dyn PluginExecutor> = Arc::new(SubprocessPluginExecutor::new(config.plugins_dir.clone()));
    let playbooks: Arc<dyn PlaybookSource> = if Path::new(&config.playbooks_dir).is_dir() {
        Arc::new(FilesystemPlaybookSource::new(
            config.playbooks_dir.clone(),
            secauto_rules::ParseBounds { max_nesting_depth: config.max_nesting_depth, max_conditions_per_rule: config.max_conditions_per_rule },
        ))
    } else {
        Arc::new(NoPlaybooks)
    };
    let rules_engine = Arc::new(RulesEngine::new(executor, plugin_executor, playbooks, &config));

    let job_manager = Arc::new(JobManager::new(store.clone(), rules_engine.clone(), webhooks.clone(), SystemClock, node_identity(&config), &config));
    let recovered = job_manager.recover().await?;
    if recovered > 0 {
        info!(recovered, "recovered jobs left running by a prior process");
    }
    let mut handles = job_manager.spawn();

    let cluster = if config.cluster_enabled {
        let queue = Arc::new(RedisQueue::connect(&config.redis_url, config.cluster_name.clone()).await?);
        let manager = Arc::new(ClusterManager::new(
            store.clone(),
            queue,
            rules_engine,
            webhooks.clone(),
            SystemClock,
            config.cluster_name.clone(),
            config.node_host.clone(),
            config.node_port,
            config.worker_pool_size as u64,
            &config,
        ));
        handles.extend(manager.start().await?);
        Some(manager)
    } else {
        None
    };

    let scheduler_submitter: Arc<dyn secauto_engine::JobSubmitter> = match &cluster {
        Some(cluster) => cluster.clone(),
        None => job_manager.clone(),
    };
    let scheduler = Arc::new(Scheduler::new(store, scheduler_submitter, webhooks, SystemClock, &config));
    handles.extend(scheduler.spawn());

    let ctx = Arc::new(ServerContext {
        job_manager,
        cluster,
        scheduler,
        start_time: Instant::now(),
        node_id: node_identity(&config),
        cluster_name: config.cluster_name.clone(),
        parse_bounds: ServerContext::parse_bounds_from(&config),
        shutdown_requested: AtomicBool::new(false),
    });

    if let Some(parent) = Path::new(&config.socket_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = std::fs::remove_file(&config.socket_path);
    let listener = UnixListener::bind(&config.socket_path)?;
    info!(socket = %config.socket_path, "listening");

    tokio::select! {
        () = serve(listener, ctx) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    for handle in handles {
        handle.abort();
    }
    let _ = std::fs::remove_file(&config.socket_path);
    Ok(())
}

fn job_ttl(config: &Config) -> Duration {
    let days = config.retention_days.max(config.failed_job_retention()).max(config.successful_job_retention()).max(1);
    Duration::from_secs(days * 24 * 3600)
}

fn node_identity(config: &Config) -> String {
    format!("{}:{}", config.node_host, config.node_port)
}
