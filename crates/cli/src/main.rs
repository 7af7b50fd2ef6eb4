// SPDX-License-Identifier: MIT

//! `secauto`: talks to a running `secautod` over its Unix socket.

mod client;
mod client_queries;
mod color;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secauto_core::Config;

use client::{ClientError, DaemonClient};
use commands::cluster::ClusterArgs;
use commands::job::JobArgs;
use commands::schedule::ScheduleArgs;
use output::OutputFormat;

fn config_path() -> PathBuf {
    std::env::var("SECAUTO_CONFIG").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("/etc/secauto/secauto.toml"))
}

#[derive(Parser)]
#[command(name = "secauto", version, about = "Client for the secautod automation daemon", styles = color::styles())]
struct Cli {
    /// Path to the daemon's Unix socket. Defaults to the configured `socket_path`.
    #[arg(long, global = true)]
    socket: Option<String>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Job submission, inspection, and cancellation
    Job(JobArgs),
    /// Schedule creation and management
    Schedule(ScheduleArgs),
    /// Cluster membership queries
    Cluster(ClusterArgs),
    /// Daemon health and uptime
    Status,
    /// Health check
    Ping,
    /// Request daemon shutdown
    Shutdown,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        // A failed connection to the daemon is the one error worth a
        // distinct exit code — everything else (bad args, daemon-side
        // rejections) exits 1.
        let code = match err.downcast_ref::<ClientError>() {
            Some(ClientError::Connect { .. }) => 2,
            _ => 1,
        };
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let socket_path = match cli.socket {
        Some(path) => path,
        None => Config::load(&config_path())?.socket_path,
    };
    let client = DaemonClient::new(socket_path);

    match cli.command {
        Command::Job(args) => commands::job::handle(args.command, &client, cli.format).await,
        Command::Schedule(args) => commands::schedule::handle(args.command, &client, cli.format).await,
        Command::Cluster(args) => commands::cluster::handle(args.command, &client, cli.format).await,
        Command::Status => commands::status::status(&client, cli.format).await,
        Command::Ping => commands::status::ping(&client).await,
        Command::Shutdown => commands::status::shutdown(&client).await,
    }
}
