// SPDX-License-Identifier: MIT

//! `secauto cluster` - read-only views of cluster membership.

use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct ClusterArgs {
    #[command(subcommand)]
    pub command: ClusterCommand,
}

#[derive(Subcommand)]
pub enum ClusterCommand {
    /// Show this node, its peers, and the distributed queue depth
    Info,
}

pub async fn handle(command: ClusterCommand, client: &DaemonClient, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ClusterCommand::Info => {
            let info = client.cluster_info().await?;
            format_or_json(format, &info, || {
                println!("{} {}", color::header("Cluster:"), info.cluster);
                println!("{} {} ({})", color::context("This node:"), info.this_node.id, info.this_node.status);
                println!("{} {}", color::context("Queue size:"), info.queue_size);
                if info.peers.is_empty() {
                    println!("No other peers registered");
                } else {
                    println!("{}", color::context("Peers:"));
                    for peer in &info.peers {
                        println!("  {:<38} {}:{} {}", peer.id.to_string(), peer.host, peer.port, peer.status);
                    }
                }
            })?;
        }
    }
    Ok(())
}
