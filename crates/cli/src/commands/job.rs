// SPDX-License-Identifier: MIT

//! `secauto job` - submit, inspect, and cancel playbook executions.

use std::collections::BTreeSet;

use clap::{Args, Subcommand};
use secauto_core::JobStatus;

use crate::client::DaemonClient;
use crate::color;
use crate::output::{format_or_json, handle_list, OutputFormat};

use super::{context_from_vars, load_playbook, parse_key_value};

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Submit a playbook for execution
    Submit {
        /// Path to a playbook JSON file, or "-" for stdin
        playbook: String,

        /// Context variables (repeatable: --var key=value)
        #[arg(long = "var", value_parser = parse_key_value)]
        var: Vec<(String, String)>,

        /// Dispatch priority, higher runs sooner
        #[arg(long, default_value_t = 0)]
        priority: i64,

        /// Tags attached to the job (repeatable)
        #[arg(long)]
        tag: Vec<String>,
    },
    /// Show a job's current state
    Get { id: String },
    /// List jobs
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Cancel a pending or running job
    Cancel { id: String },
    /// Show aggregate job counters
    Stats,
}

fn parse_status(s: &str) -> anyhow::Result<JobStatus> {
    Ok(match s.to_lowercase().as_str() {
        "pending" => JobStatus::Pending,
        "running" => JobStatus::Running,
        "completed" => JobStatus::Completed,
        "failed" => JobStatus::Failed,
        "cancelled" => JobStatus::Cancelled,
        other => anyhow::bail!("unknown job status: {other}"),
    })
}

pub async fn handle(command: JobCommand, client: &DaemonClient, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        JobCommand::Submit { playbook, var, priority, tag } => {
            let playbook = load_playbook(&playbook)?;
            let context = context_from_vars(var);
            let tags: BTreeSet<String> = tag.into_iter().collect();
            let job_id = client.submit_job(playbook, context, priority, tags).await?;
            println!("{} {}", color::header("Submitted job:"), job_id);
        }
        JobCommand::Get { id } => {
            let job = client.get_job(&id).await?;
            format_or_json(format, &job, || match &job {
                Some(job) => {
                    println!("{} {}", color::header("Job:"), job.id);
                    println!("  {} {}", color::context("Status:"), job.status);
                    println!("  {} {}", color::context("Submitted:"), job.submitted_at);
                    if let Some(node) = &job.assigned_node {
                        println!("  {} {}", color::context("Node:"), node);
                    }
                    if let Some(error) = &job.error {
                        println!("  {} {}", color::context("Error:"), error);
                    }
                    if !job.results.is_empty() {
                        println!("  {}", color::context("Results:"));
                        for (i, result) in job.results.iter().enumerate() {
                            println!("    [{i}] {result}");
                        }
                    }
                }
                None => println!("Job not found: {id}"),
            })?;
        }
        JobCommand::List { status, limit } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let jobs = client.list_jobs(status, limit).await?;
            handle_list(format, &jobs, "No jobs", |jobs| {
                for job in jobs {
                    println!("{:<24} {:<10} {}", job.id.to_string(), job.status.to_string(), job.submitted_at);
                }
            })?;
        }
        JobCommand::Cancel { id } => {
            let outcome = client.cancel_job(&id).await?;
            println!("Job {id}: {outcome:?}");
        }
        JobCommand::Stats => {
            let stats = client.job_stats().await?;
            format_or_json(format, &stats, || {
                for (status, count) in &stats.counts_by_status {
                    println!("{status:<12} {count}");
                }
                if let Some(avg) = stats.avg_duration_ms {
                    println!("{} {:.1}ms", color::context("avg duration:"), avg);
                }
            })?;
        }
    }
    Ok(())
}
