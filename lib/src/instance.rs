// SPDX-License-Identifier: MPL-2.0

//! Advisory single-instance lease. Two applets polling and rendering the
//! same tray would fight over notifications; the second one simply refuses
//! to start.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// Process exit code when another instance already holds the lease.
pub const ALREADY_RUNNING_EXIT_CODE: i32 = 2;

/// Holds the exclusive lock on the lock file; the lease lasts as long as
/// this guard is alive.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
}

/// Try to acquire the lease. `Ok(None)` means another instance holds it.
pub fn acquire(lock_file: &Path) -> Result<Option<InstanceLock>> {
    if let Some(parent) = lock_file.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(lock_file)
        .with_context(|| format!("Failed to open lock file {}", lock_file.display()))?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(InstanceLock { _file: file })),
        Err(_) => Ok(None),
    }
}
