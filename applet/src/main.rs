// SPDX-License-Identifier: MPL-2.0

//! Tray applet for an rclone OneDrive bisync job driven by a systemd user
//! service/timer pair. One poll loop observes the status marker and the
//! log tail, renders the tray, and executes menu commands; the adaptive
//! delay shortens while a sync is running.

mod actions;
mod tray;

use anyhow::{Context, Result};
use log::{info, warn};
use rclone_tray_lib::{
    commands, instance, poll, progress, status, tail, timer, NotificationSender,
    NotificationUrgency, Paths, Settings, SyncEvent, SyncState,
};
use tokio::sync::mpsc;
use tray::{RcloneTray, TrayCommand};

/// Log window sizes, matching what rclone emits between poll ticks.
const PROGRESS_WINDOW_LINES: usize = 15;
const SUCCESS_WINDOW_LINES: usize = 50;

struct Observation {
    online: bool,
    state: SyncState,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paths = Paths::new().context("Failed to resolve well-known paths")?;

    // Single-instance lease, held for the process lifetime.
    let _lock = match instance::acquire(&paths.lock_file)? {
        Some(lock) => lock,
        None => {
            eprintln!("rclone-tray is already running, exiting.");
            std::process::exit(instance::ALREADY_RUNNING_EXIT_CODE);
        }
    };

    let settings = Settings::load_or_create(&paths.settings_file, &paths.home);
    info!(
        "Starting rclone tray applet, remote {} -> {}",
        settings.remote,
        settings.local_dir.display()
    );

    let notifier = match NotificationSender::new().await {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            warn!("Desktop notifications unavailable: {}", e);
            None
        }
    };

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let service = ksni::TrayService::new(RcloneTray::new(
        timer::current_interval(&paths.timer_unit),
        command_tx,
    ));
    let handle = service.handle();
    service.spawn();

    let ctx = actions::ActionContext {
        paths: &paths,
        settings: &settings,
        notifier: notifier.as_ref(),
    };

    // Prior observed state, threaded through the loop to decide whether a
    // completion or failure notification is due.
    let mut prev_state = SyncState::Init;
    loop {
        let observed = observe(&paths, &handle).await;
        if observed.online {
            match poll::transition(&prev_state, &observed.state) {
                Some(SyncEvent::Completed) => {
                    info!("Sync finished");
                    ctx_notify(&ctx, "OneDrive sync complete", "Files are up to date", false)
                        .await;
                }
                Some(SyncEvent::Failed) => {
                    warn!("Sync failed, see {}", paths.log_file.display());
                    ctx_notify(&ctx, "OneDrive sync failed", "Check the log for details", true)
                        .await;
                }
                None => {}
            }
            prev_state = observed.state.clone();
        }

        tokio::select! {
            _ = tokio::time::sleep(poll::next_delay(&observed.state)) => {}
            command = command_rx.recv() => match command {
                Some(TrayCommand::Quit) | None => break,
                // Any other command triggers an immediate re-poll once done.
                Some(command) => actions::run(&ctx, command).await,
            }
        }
    }

    info!("Shutting down");
    handle.shutdown();
    Ok(())
}

/// One point-in-time observation: classify, tail, extract, then push the
/// whole snapshot into the tray. Nothing here can fail; every read
/// degrades to a safe default.
async fn observe(paths: &Paths, handle: &ksni::Handle<RcloneTray>) -> Observation {
    let online = commands::network_online().await;
    let state = status::classify(&paths.status_file);
    let snapshot = if online && state.is_syncing() {
        progress::extract_progress(&tail::tail_lines(&paths.log_file, PROGRESS_WINDOW_LINES))
    } else {
        None
    };
    let last_success =
        progress::last_success_timestamp(&tail::tail_lines(&paths.log_file, SUCCESS_WINDOW_LINES));
    let interval = timer::current_interval(&paths.timer_unit);

    handle.update(|tray| {
        tray.online = online;
        tray.state = state.clone();
        tray.progress = snapshot.clone();
        tray.last_success = last_success.clone();
        tray.interval_minutes = interval;
    });

    Observation { online, state }
}

async fn ctx_notify(ctx: &actions::ActionContext<'_>, summary: &str, body: &str, urgent: bool) {
    if let Some(notifier) = ctx.notifier {
        let urgency = if urgent {
            NotificationUrgency::Critical
        } else {
            NotificationUrgency::Normal
        };
        if let Err(e) = notifier.send(summary, body, urgency).await {
            warn!("Notification failed: {}", e);
        }
    }
}
