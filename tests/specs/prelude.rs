//! Test helpers for behavioral specifications.
//!
//! Spawns a throwaway `secautod` against a temp state dir and a Redis
//! reachable at `REDIS_URL` (default `redis://127.0.0.1:6379`), then drives
//! it with the `secauto` CLI the way an operator would.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Locates a binary built alongside this test binary. Mirrors the fallback
/// chain production black-box specs use: the standard `target/debug`
/// location first, then a path derived from the running test binary's own
/// location (covers coverage/alternate-target-dir builds).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

pub fn secauto_cmd() -> Command {
    Command::new(binary_path("secauto"))
}

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// A running `secautod` under a temp state dir, killed on drop.
pub struct Daemon {
    child: Child,
    dir: tempfile::TempDir,
    config_path: PathBuf,
}

impl Daemon {
    /// Spawns `secautod` with cluster dispatch disabled (single-node local
    /// path only) and an automations directory the caller can drop scripts
    /// into before submitting playbooks that reference them.
    pub fn spawn() -> Self {
        Self::spawn_with(|_| {})
    }

    pub fn spawn_with(customize: impl FnOnce(&Path)) -> Self {
        let dir = tempfile::tempdir().expect("create temp state dir");
        let automations_dir = dir.path().join("automations");
        std::fs::create_dir_all(&automations_dir).expect("create automations dir");
        customize(&automations_dir);

        let socket_path = dir.path().join("secauto.sock");
        let config_path = dir.path().join("secauto.toml");
        let config = format!(
            r#"
cluster_enabled = false
redis_url = "{redis}"
state_dir = "{state_dir}"
socket_path = "{socket}"
lock_path = "{lock}"
automations_dir = "{automations}"
heartbeat_interval_secs = 1
cleanup_interval_secs = 3600
"#,
            redis = redis_url(),
            state_dir = dir.path().display(),
            socket = socket_path.display(),
            lock = dir.path().join("secauto.lock").display(),
            automations = automations_dir.display(),
        );
        std::fs::write(&config_path, config).expect("write daemon config");

        let child = Command::new(binary_path("secautod"))
            .env("SECAUTO_CONFIG", &config_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn secautod");

        let daemon = Self { child, dir, config_path };
        daemon.wait_for_socket(&socket_path);
        daemon
    }

    fn wait_for_socket(&self, socket_path: &Path) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if socket_path.exists() {
                return;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        panic!("secautod did not create its socket at {}", socket_path.display());
    }

    pub fn socket_path(&self) -> PathBuf {
        self.dir.path().join("secauto.sock")
    }

    pub fn cli(&self) -> Command {
        let mut cmd = secauto_cmd();
        cmd.env("SECAUTO_CONFIG", &self.config_path);
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.cli().args(args).output().expect("run secauto CLI")
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Polls `f` until it returns `Some`, or panics after the timeout.
pub fn poll_until<T>(timeout: Duration, mut f: impl FnMut() -> Option<T>) -> T {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = f() {
            return value;
        }
        if Instant::now() >= deadline {
            panic!("condition did not become true within {timeout:?}");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}
