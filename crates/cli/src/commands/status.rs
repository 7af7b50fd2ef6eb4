// SPDX-License-Identifier: MIT

//! `secauto status`/`ping`/`shutdown` - daemon health and lifecycle.

use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_or_json, OutputFormat};

pub async fn status(client: &DaemonClient, format: OutputFormat) -> anyhow::Result<()> {
    let (uptime_secs, node_id, cluster) = client.status().await?;
    format_or_json(format, &serde_json::json!({"uptime_secs": uptime_secs, "node_id": node_id, "cluster": cluster}), || {
        println!("{} {}", color::header("Node:"), node_id);
        println!("{} {}", color::context("Cluster:"), cluster);
        println!("{} {}s", color::context("Uptime:"), uptime_secs);
    })?;
    Ok(())
}

pub async fn ping(client: &DaemonClient) -> anyhow::Result<()> {
    client.ping().await?;
    println!("pong");
    Ok(())
}

pub async fn shutdown(client: &DaemonClient) -> anyhow::Result<()> {
    client.shutdown().await?;
    println!("shutdown requested");
    Ok(())
}
