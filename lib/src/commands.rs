// SPDX-License-Identifier: MPL-2.0

//! Invocations of the external collaborators: systemd, rclone and the
//! desktop file-open dispatcher. Everything except `daemon_reload` is
//! fire-and-forget; the spawned process is never waited on and its output
//! is never captured.

use crate::config::{Paths, Settings, SERVICE_NAME, TIMER_NAME};
use anyhow::{ensure, Context, Result};
use log::debug;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const SYSTEMCTL: &str = "/usr/bin/systemctl";
const RCLONE: &str = "/usr/bin/rclone";

/// True when systemd reports the network-online target as active.
pub async fn network_online() -> bool {
    let probe = Command::new(SYSTEMCTL)
        .args(["is-active", "--quiet", "network-online.target"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match probe {
        Ok(status) => status.success(),
        Err(e) => {
            debug!("network-online probe failed: {}", e);
            false
        }
    }
}

/// Restart the sync service, which kicks off a sync right away.
pub fn restart_service() -> Result<()> {
    let mut cmd = Command::new(SYSTEMCTL);
    cmd.args(["--user", "restart", SERVICE_NAME]);
    spawn_detached(&mut cmd)
}

pub fn restart_timer() -> Result<()> {
    let mut cmd = Command::new(SYSTEMCTL);
    cmd.args(["--user", "restart", TIMER_NAME]);
    spawn_detached(&mut cmd)
}

/// Ask systemd to pick up edited unit files. This one is waited on so a
/// restart issued right after sees the new definition.
pub async fn daemon_reload() -> Result<()> {
    let status = Command::new(SYSTEMCTL)
        .args(["--user", "daemon-reload"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .context("Failed to run systemctl daemon-reload")?;
    ensure!(status.success(), "daemon-reload exited with {}", status);
    Ok(())
}

/// Kick off a full `--resync` run outside the service. Recovers from a
/// stale bisync lock at the cost of re-transferring state.
pub fn start_resync(settings: &Settings, paths: &Paths) -> Result<()> {
    let mut cmd = Command::new(RCLONE);
    cmd.arg("bisync")
        .arg(&settings.remote)
        .arg(&settings.local_dir)
        .arg("--resync")
        .arg("--verbose")
        .arg("--log-file")
        .arg(&paths.log_file);
    spawn_detached(&mut cmd)
}

/// Open a file or folder with the desktop's default handler.
pub fn open_path(target: &Path) -> Result<()> {
    ensure!(target.exists(), "File not found: {}", target.display());
    open::that_detached(target)
        .with_context(|| format!("Failed to open {}", target.display()))
}

pub fn open_url(url: &str) -> Result<()> {
    open::that_detached(url).with_context(|| format!("Failed to open {}", url))
}

fn spawn_detached(cmd: &mut Command) -> Result<()> {
    let child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to spawn external command")?;
    // No wait, no output capture; the runtime reaps the child eventually.
    drop(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_path_rejects_missing_files_without_spawning() {
        let dir = TempDir::new().unwrap();
        let err = open_path(&dir.path().join("missing.conf")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
