// SPDX-License-Identifier: MPL-2.0

//! Executes menu commands. Every command here is user-initiated, so a
//! spawn failure surfaces as a critical notification instead of being
//! logged away; nothing here can take the poll loop down.

use crate::tray::TrayCommand;
use log::{error, info, warn};
use rclone_tray_lib::{commands, timer, NotificationSender, NotificationUrgency, Paths, Settings};

pub struct ActionContext<'a> {
    pub paths: &'a Paths,
    pub settings: &'a Settings,
    pub notifier: Option<&'a NotificationSender>,
}

impl ActionContext<'_> {
    async fn notify(&self, summary: &str, body: &str, urgency: NotificationUrgency) {
        if let Some(notifier) = self.notifier {
            if let Err(e) = notifier.send(summary, body, urgency).await {
                warn!("Notification failed: {}", e);
            }
        }
    }

    async fn report_failure(&self, what: &str, err: anyhow::Error) {
        error!("{} failed: {:#}", what, err);
        self.notify(
            "OneDrive",
            &format!("{} failed: {}", what, err),
            NotificationUrgency::Critical,
        )
        .await;
    }
}

/// Run one menu command to completion. `Quit` never reaches this point.
pub async fn run(ctx: &ActionContext<'_>, command: TrayCommand) {
    match command {
        TrayCommand::SyncNow => {
            ctx.notify(
                "OneDrive",
                "Starting manual sync...",
                NotificationUrgency::Normal,
            )
            .await;
            if let Err(e) = commands::restart_service() {
                ctx.report_failure("Manual sync", e).await;
            }
        }
        TrayCommand::RestartAll => {
            ctx.notify(
                "OneDrive",
                "Reloading configuration and restarting the sync units...",
                NotificationUrgency::Normal,
            )
            .await;
            let restart = async {
                commands::daemon_reload().await?;
                commands::restart_service()?;
                commands::restart_timer()
            };
            if let Err(e) = restart.await {
                ctx.report_failure("Restart", e).await;
            }
        }
        TrayCommand::SetInterval(minutes) => {
            match timer::set_interval(&ctx.paths.timer_unit, minutes) {
                Ok(true) => {
                    let apply = async {
                        commands::daemon_reload().await?;
                        commands::restart_timer()
                    };
                    match apply.await {
                        Ok(()) => {
                            ctx.notify(
                                "OneDrive",
                                &format!("Sync interval set to {} minutes", minutes),
                                NotificationUrgency::Normal,
                            )
                            .await;
                        }
                        Err(e) => ctx.report_failure("Timer restart", e).await,
                    }
                }
                Ok(false) => {
                    info!("Sync interval already at {} minutes", minutes);
                }
                Err(e) => ctx.report_failure("Interval change", e).await,
            }
        }
        TrayCommand::OpenLocalFolder => {
            if let Err(e) = commands::open_path(&ctx.settings.local_dir) {
                ctx.report_failure("Opening local folder", e).await;
            }
        }
        TrayCommand::OpenWeb => {
            if let Err(e) = commands::open_url(&ctx.settings.web_url) {
                ctx.report_failure("Opening OneDrive on the web", e).await;
            }
        }
        TrayCommand::OpenLog => {
            if let Err(e) = commands::open_path(&ctx.paths.log_file) {
                ctx.report_failure("Opening the log", e).await;
            }
        }
        TrayCommand::EditRcloneConf => {
            if let Err(e) = commands::open_path(&ctx.paths.rclone_conf) {
                ctx.report_failure("Opening the rclone configuration", e).await;
            }
        }
        TrayCommand::EditServiceUnit => {
            if let Err(e) = commands::open_path(&ctx.paths.service_unit) {
                ctx.report_failure("Opening the service unit", e).await;
            }
        }
        TrayCommand::EditTimerUnit => {
            if let Err(e) = commands::open_path(&ctx.paths.timer_unit) {
                ctx.report_failure("Opening the timer unit", e).await;
            }
        }
        TrayCommand::ForceResync => {
            // Deliberately loud: a resync re-transfers state and is only
            // meant for recovering from a stale bisync lock.
            ctx.notify(
                "OneDrive",
                "Starting forced resync...",
                NotificationUrgency::Critical,
            )
            .await;
            if let Err(e) = commands::start_resync(ctx.settings, ctx.paths) {
                ctx.report_failure("Forced resync", e).await;
            }
        }
        TrayCommand::Quit => unreachable!("Quit is handled by the poll loop"),
    }
}
