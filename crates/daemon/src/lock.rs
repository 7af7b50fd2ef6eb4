// SPDX-License-Identifier: MIT

//! Exclusive startup lock, preventing two daemons from sharing a state
//! directory. Holds an open file with an `flock`-style exclusive lock for
//! the life of the process; the lock is released automatically when the
//! file descriptor closes (process exit or explicit `drop`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("opening lock file {path}: {source}")]
    Open { path: String, #[source] source: std::io::Error },
    #[error("another secautod instance already holds the lock at {0}")]
    AlreadyLocked(String),
}

/// Holds the lock file open; dropping this releases it.
pub struct StartupLock {
    _file: File,
}

/// Acquires an exclusive lock on `path`, creating it if absent, and writes
/// this process's PID into it. Does not truncate before locking, so a
/// failed attempt never wipes the PID of the daemon that already holds it.
pub fn acquire(path: &Path) -> Result<StartupLock, LockError> {
    let map_open = |source| LockError::Open { path: path.display().to_string(), source };

    let mut file = OpenOptions::new().write(true).create(true).truncate(false).open(path).map_err(map_open)?;
    file.try_lock_exclusive().map_err(|_| LockError::AlreadyLocked(path.display().to_string()))?;

    file.set_len(0).map_err(map_open)?;
    writeln!(file, "{}", std::process::id()).map_err(map_open)?;

    Ok(StartupLock { _file: file })
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
