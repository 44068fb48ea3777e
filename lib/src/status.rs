// SPDX-License-Identifier: MPL-2.0

use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;

/// Current state of the background sync job, as written by the job itself
/// into the status marker file. The applet never transitions this state;
/// it only re-reads it on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Init,
    Idle,
    Syncing,
    Failed,
    /// A token outside the known set, carried through unchanged so the UI
    /// can show it instead of guessing a stricter classification.
    Unknown(String),
}

impl SyncState {
    pub fn is_syncing(&self) -> bool {
        matches!(self, SyncState::Syncing)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Init => write!(f, "initializing"),
            SyncState::Idle => write!(f, "idle"),
            SyncState::Syncing => write!(f, "syncing"),
            SyncState::Failed => write!(f, "failed"),
            SyncState::Unknown(token) => write!(f, "{}", token),
        }
    }
}

/// Read the status marker and classify its content.
///
/// Fails open: an absent or unreadable marker means the job is simply not
/// running, so the answer is `Idle`, never an error.
pub fn classify(status_file: &Path) -> SyncState {
    let content = match fs::read_to_string(status_file) {
        Ok(content) => content,
        Err(e) => {
            debug!(
                "Status marker {} not readable: {}",
                status_file.display(),
                e
            );
            return SyncState::Idle;
        }
    };
    match content.trim() {
        "INIT" => SyncState::Init,
        // An empty marker is a half-written file; treat it as idle.
        "IDLE" | "" => SyncState::Idle,
        "SYNCING" => SyncState::Syncing,
        "FAILED" => SyncState::Failed,
        other => SyncState::Unknown(other.to_string()),
    }
}
