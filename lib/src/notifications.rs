// SPDX-License-Identifier: MPL-2.0

use anyhow::Result;
use std::collections::HashMap;
use zbus::zvariant::Value;
use zbus::Connection;

const APP_NAME: &str = "OneDrive Sync";
const TIMEOUT_MS: i32 = 5000;

/// Notification urgency levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationUrgency {
    Low,
    Normal,
    Critical,
}

impl NotificationUrgency {
    pub fn to_u8(self) -> u8 {
        match self {
            NotificationUrgency::Low => 0,
            NotificationUrgency::Normal => 1,
            NotificationUrgency::Critical => 2,
        }
    }

    fn icon_name(self) -> &'static str {
        match self {
            NotificationUrgency::Critical => "dialog-error",
            _ => "emblem-default",
        }
    }
}

/// Desktop notification sender over org.freedesktop.Notifications.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    connection: Connection,
}

impl NotificationSender {
    pub async fn new() -> Result<Self> {
        let connection = Connection::session().await?;
        Ok(Self { connection })
    }

    /// Send a desktop notification. Best effort; callers decide whether a
    /// failure is worth logging.
    pub async fn send(
        &self,
        summary: &str,
        body: &str,
        urgency: NotificationUrgency,
    ) -> Result<()> {
        let proxy = zbus::Proxy::new(
            &self.connection,
            "org.freedesktop.Notifications",
            "/org/freedesktop/Notifications",
            "org.freedesktop.Notifications",
        )
        .await?;

        let mut hints: HashMap<&str, Value> = HashMap::new();
        hints.insert("urgency", Value::U8(urgency.to_u8()));

        let _id: u32 = proxy
            .call(
                "Notify",
                &(
                    APP_NAME,
                    0u32,
                    urgency.icon_name(),
                    summary,
                    body,
                    Vec::<&str>::new(),
                    hints,
                    TIMEOUT_MS,
                ),
            )
            .await?;

        Ok(())
    }
}
