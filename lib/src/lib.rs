// SPDX-License-Identifier: MPL-2.0

//! Shared logic for the rclone OneDrive tray applet.
//!
//! Everything the applet binary needs to observe the external sync job
//! (status marker, log tail, timer unit) and to talk to the desktop
//! (notifications, file/URL opening, systemd restarts) lives here so it
//! can be tested against plain files.

pub mod commands;
pub mod config;
pub mod instance;
pub mod notifications;
pub mod poll;
pub mod progress;
pub mod status;
pub mod tail;
pub mod timer;

// Re-export main types
pub use config::{Paths, Settings};
pub use notifications::{NotificationSender, NotificationUrgency};
pub use poll::{next_delay, transition, SyncEvent};
pub use progress::ProgressSnapshot;
pub use status::SyncState;
