//! Behavioral specifications for the `secauto`/`secautod` CLI and daemon.
//!
//! Black-box: these invoke the compiled binaries and check stdout/exit
//! codes, the same way the CLI's actual users would. Cases that need a
//! running daemon also need a reachable Redis (the daemon refuses to start
//! without one per the Store's contract); those are marked `#[ignore]` and
//! read `REDIS_URL` the same way the per-crate Redis-backed tests do.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/help.rs"]
mod cli_help;

#[path = "specs/daemon/lifecycle.rs"]
mod daemon_lifecycle;

#[path = "specs/daemon/job_submit.rs"]
mod daemon_job_submit;

#[path = "specs/daemon/schedule.rs"]
mod daemon_schedule;
