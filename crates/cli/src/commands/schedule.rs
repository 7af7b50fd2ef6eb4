// SPDX-License-Identifier: MIT

//! `secauto schedule` - create and manage recurring/one-shot playbook schedules.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use secauto_core::{ScheduleStatus, ScheduleType};

use crate::client::DaemonClient;
use crate::client_queries::ScheduleFields;
use crate::color;
use crate::output::{format_or_json, handle_list, OutputFormat};

use super::{context_from_vars, load_playbook, parse_key_value};

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Args)]
pub struct ScheduleSpec {
    /// Schedule name
    pub name: String,
    /// Path to a playbook JSON file, or "-" for stdin
    pub playbook: String,

    #[arg(long, value_parser = parse_schedule_type)]
    pub schedule_type: ScheduleType,
    #[arg(long)]
    pub cron: Option<String>,
    #[arg(long)]
    pub interval_secs: Option<u64>,
    #[arg(long)]
    pub start_time: Option<DateTime<Utc>>,
    #[arg(long)]
    pub end_time: Option<DateTime<Utc>>,
    #[arg(long, default_value_t = 0)]
    pub max_runs: u64,
    #[arg(long, default_value_t = String::new())]
    pub description: String,
    #[arg(long = "var", value_parser = parse_key_value)]
    pub var: Vec<(String, String)>,
    #[arg(long, default_value_t = 0)]
    pub priority: i64,
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Create a new schedule
    Create(ScheduleSpec),
    /// Replace an existing schedule's definition
    Update {
        id: String,
        #[command(flatten)]
        spec: ScheduleSpec,
    },
    /// Show a schedule's current state
    Get { id: String },
    /// List schedules
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete a schedule
    Delete { id: String },
    /// Pause a schedule (stops firing until resumed)
    Pause { id: String },
    /// Resume a paused schedule
    Resume { id: String },
    /// Show aggregate schedule counters
    Stats,
}

fn parse_schedule_type(s: &str) -> Result<ScheduleType, String> {
    Ok(match s.to_lowercase().as_str() {
        "cron" => ScheduleType::Cron,
        "interval" => ScheduleType::Interval,
        "once" => ScheduleType::Once,
        "recurring" => ScheduleType::Recurring,
        other => return Err(format!("unknown schedule type: {other}")),
    })
}

fn parse_status(s: &str) -> anyhow::Result<ScheduleStatus> {
    Ok(match s.to_lowercase().as_str() {
        "active" => ScheduleStatus::Active,
        "paused" => ScheduleStatus::Paused,
        "deleted" => ScheduleStatus::Deleted,
        "expired" => ScheduleStatus::Expired,
        other => anyhow::bail!("unknown schedule status: {other}"),
    })
}

fn fields_from_spec(spec: ScheduleSpec) -> anyhow::Result<ScheduleFields> {
    Ok(ScheduleFields {
        name: spec.name,
        description: spec.description,
        schedule_type: spec.schedule_type,
        cron_expression: spec.cron,
        interval_seconds: spec.interval_secs,
        start_time: spec.start_time,
        end_time: spec.end_time,
        max_runs: spec.max_runs,
        playbook: load_playbook(&spec.playbook)?,
        context: context_from_vars(spec.var),
        priority: spec.priority,
        tags: spec.tag.into_iter().collect::<BTreeSet<_>>(),
    })
}

fn print_schedule(schedule: &secauto_core::Schedule) {
    println!("{} {}", color::header("Schedule:"), schedule.id);
    println!("  {} {}", color::context("Name:"), schedule.name);
    println!("  {} {}", color::context("Type:"), schedule.schedule_type);
    println!("  {} {}", color::context("Status:"), schedule.status);
    if let Some(next) = schedule.next_run {
        println!("  {} {}", color::context("Next run:"), next);
    }
    println!("  {} {}/{}", color::context("Runs:"), schedule.run_count, schedule.max_runs);
}

pub async fn handle(command: ScheduleCommand, client: &DaemonClient, format: OutputFormat) -> anyhow::Result<()> {
    match command {
        ScheduleCommand::Create(spec) => {
            let schedule = client.create_schedule(fields_from_spec(spec)?).await?;
            format_or_json(format, &schedule, || print_schedule(&schedule))?;
        }
        ScheduleCommand::Update { id, spec } => {
            let schedule = client.update_schedule(&id, fields_from_spec(spec)?).await?;
            format_or_json(format, &schedule, || print_schedule(&schedule))?;
        }
        ScheduleCommand::Get { id } => {
            let schedule = client.get_schedule(&id).await?;
            format_or_json(format, &schedule, || match &schedule {
                Some(schedule) => print_schedule(schedule),
                None => println!("Schedule not found: {id}"),
            })?;
        }
        ScheduleCommand::List { status, limit } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let schedules = client.list_schedules(status, limit).await?;
            handle_list(format, &schedules, "No schedules", |schedules| {
                for schedule in schedules {
                    println!("{:<24} {:<10} {:<10} {}", schedule.id.to_string(), schedule.schedule_type.to_string(), schedule.status.to_string(), schedule.name);
                }
            })?;
        }
        ScheduleCommand::Delete { id } => {
            client.delete_schedule(&id).await?;
            println!("Deleted schedule {id}");
        }
        ScheduleCommand::Pause { id } => {
            let schedule = client.pause_schedule(&id).await?;
            println!("Paused schedule {} ({})", schedule.id, schedule.name);
        }
        ScheduleCommand::Resume { id } => {
            let schedule = client.resume_schedule(&id).await?;
            println!("Resumed schedule {} ({})", schedule.id, schedule.name);
        }
        ScheduleCommand::Stats => {
            let stats = client.schedule_stats().await?;
            format_or_json(format, &stats, || {
                for (status, count) in &stats.counts_by_status {
                    println!("{status:<12} {count}");
                }
                println!("{} {}", color::context("total runs:"), stats.total_runs);
            })?;
        }
    }
    Ok(())
}
