// SPDX-License-Identifier: MPL-2.0

//! StatusNotifierItem tray. The tray thread owns this struct; the poll
//! loop pushes fresh observations in through the ksni handle, and menu
//! activations go the other way over the command channel so the tray
//! thread never blocks on systemd or D-Bus.

use ksni::menu::{MenuItem, RadioGroup, RadioItem, StandardItem, SubMenu};
use ksni::{Category, ToolTip, Tray};
use log::error;
use rclone_tray_lib::{ProgressSnapshot, SyncState};
use tokio::sync::mpsc::UnboundedSender;

/// Interval choices offered in the radio group, label and minutes.
pub const INTERVAL_CHOICES: &[(&str, u32)] = &[
    ("10 minutes", 10),
    ("30 minutes", 30),
    ("1 hour", 60),
    ("2 hours", 120),
    ("4 hours", 240),
];

/// Menu commands, handled by the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    SyncNow,
    RestartAll,
    SetInterval(u32),
    OpenLocalFolder,
    OpenWeb,
    OpenLog,
    EditRcloneConf,
    EditServiceUnit,
    EditTimerUnit,
    ForceResync,
    Quit,
}

pub struct RcloneTray {
    pub online: bool,
    pub state: SyncState,
    pub progress: Option<ProgressSnapshot>,
    pub last_success: Option<String>,
    pub interval_minutes: u32,
    commands: UnboundedSender<TrayCommand>,
}

impl RcloneTray {
    pub fn new(interval_minutes: u32, commands: UnboundedSender<TrayCommand>) -> Self {
        Self {
            online: true,
            state: SyncState::Init,
            progress: None,
            last_success: None,
            interval_minutes,
            commands,
        }
    }

    fn send(&self, command: TrayCommand) {
        if let Err(e) = self.commands.send(command) {
            error!("Tray command dropped: {}", e);
        }
    }

    /// One-line status shown at the top of the menu and in the tooltip.
    pub fn status_line(&self) -> String {
        if !self.online {
            return "Waiting for network".to_string();
        }
        match &self.state {
            SyncState::Syncing => match &self.progress {
                Some(progress) => format!("Syncing: {}", progress),
                None => "Analyzing changes...".to_string(),
            },
            SyncState::Failed => "Last sync failed".to_string(),
            SyncState::Init => "Initializing".to_string(),
            SyncState::Idle => "Idle".to_string(),
            SyncState::Unknown(token) => format!("State: {}", token),
        }
    }

    fn sync_enabled(&self) -> bool {
        self.online && !self.state.is_syncing()
    }
}

impl Tray for RcloneTray {
    fn id(&self) -> String {
        "rclone-onedrive".into()
    }

    fn category(&self) -> Category {
        Category::ApplicationStatus
    }

    fn title(&self) -> String {
        if self.state.is_syncing() {
            self.status_line()
        } else {
            "OneDrive".to_string()
        }
    }

    fn icon_name(&self) -> String {
        if !self.online {
            return "network-offline".into();
        }
        match self.state {
            SyncState::Syncing => "emblem-synchronizing".into(),
            SyncState::Failed => "dialog-error".into(),
            _ => "emblem-default".into(),
        }
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: "OneDrive".to_string(),
            description: self.status_line(),
            ..Default::default()
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        let selected = INTERVAL_CHOICES
            .iter()
            .position(|(_, minutes)| *minutes == self.interval_minutes)
            .unwrap_or(1);
        let last_success = self
            .last_success
            .clone()
            .unwrap_or_else(|| "unknown".to_string());

        vec![
            StandardItem {
                label: format!("Status: {}", self.status_line()),
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Sync now".into(),
                icon_name: "view-refresh".into(),
                enabled: self.sync_enabled(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::SyncNow)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Open local folder".into(),
                icon_name: "folder-open".into(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::OpenLocalFolder)),
                ..Default::default()
            }
            .into(),
            SubMenu {
                label: "Sync interval".into(),
                submenu: vec![MenuItem::RadioGroup(RadioGroup {
                    selected,
                    select: Box::new(|tray: &mut Self, index| {
                        let (_, minutes) = INTERVAL_CHOICES[index];
                        tray.interval_minutes = minutes;
                        tray.send(TrayCommand::SetInterval(minutes));
                    }),
                    options: INTERVAL_CHOICES
                        .iter()
                        .map(|(label, _)| RadioItem {
                            label: (*label).into(),
                            ..Default::default()
                        })
                        .collect(),
                })],
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Restart service and timer".into(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::RestartAll)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            SubMenu {
                label: "Advanced".into(),
                submenu: vec![
                    StandardItem {
                        label: "Force resync (--resync)".into(),
                        activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::ForceResync)),
                        ..Default::default()
                    }
                    .into(),
                    MenuItem::Separator,
                    SubMenu {
                        label: "Edit configuration".into(),
                        submenu: vec![
                            StandardItem {
                                label: "Rclone configuration".into(),
                                activate: Box::new(|tray: &mut Self| {
                                    tray.send(TrayCommand::EditRcloneConf)
                                }),
                                ..Default::default()
                            }
                            .into(),
                            StandardItem {
                                label: "Service unit".into(),
                                activate: Box::new(|tray: &mut Self| {
                                    tray.send(TrayCommand::EditServiceUnit)
                                }),
                                ..Default::default()
                            }
                            .into(),
                            StandardItem {
                                label: "Timer unit".into(),
                                activate: Box::new(|tray: &mut Self| {
                                    tray.send(TrayCommand::EditTimerUnit)
                                }),
                                ..Default::default()
                            }
                            .into(),
                        ],
                        ..Default::default()
                    }
                    .into(),
                    MenuItem::Separator,
                    StandardItem {
                        label: "Open OneDrive on the web".into(),
                        icon_name: "web-browser".into(),
                        activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::OpenWeb)),
                        ..Default::default()
                    }
                    .into(),
                ],
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "View log".into(),
                icon_name: "text-x-generic".into(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::OpenLog)),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: format!("Last sync: {}", last_success),
                enabled: false,
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|tray: &mut Self| tray.send(TrayCommand::Quit)),
                ..Default::default()
            }
            .into(),
        ]
    }
}
