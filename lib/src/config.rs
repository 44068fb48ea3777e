// SPDX-License-Identifier: MPL-2.0

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Systemd user units driving the background sync job.
pub const SERVICE_NAME: &str = "rclone-onedrive.service";
pub const TIMER_NAME: &str = "rclone-onedrive.timer";

static SETTINGS_FILE_NAME: &str = "settings.json";

/// Well-known files the applet reads, rewrites or opens.
///
/// All of them are derived from one home directory so tests can build a
/// `Paths` against a tempdir instead of the real home.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub status_file: PathBuf,
    pub log_file: PathBuf,
    pub service_unit: PathBuf,
    pub timer_unit: PathBuf,
    pub rclone_conf: PathBuf,
    pub lock_file: PathBuf,
    pub settings_file: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base =
            BaseDirs::new().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(Self::under(base.home_dir()))
    }

    /// Build the path set relative to an arbitrary home directory.
    pub fn under(home: &Path) -> Self {
        let cache = home.join(".cache");
        let config = home.join(".config");
        Self {
            home: home.to_path_buf(),
            status_file: cache.join("rclone-onedrive.status"),
            log_file: cache.join("rclone-onedrive.log"),
            service_unit: config.join("systemd/user").join(SERVICE_NAME),
            timer_unit: config.join("systemd/user").join(TIMER_NAME),
            rclone_conf: config.join("rclone/rclone.conf"),
            lock_file: cache.join("rclone-tray.lock"),
            settings_file: config.join("rclone-tray").join(SETTINGS_FILE_NAME),
        }
    }
}

/// User-tunable settings for the applet itself.
///
/// The sync engine has its own configuration (`rclone.conf`, the unit
/// files); this file only names what the applet syncs against and opens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Rclone remote passed to `bisync`, e.g. `OneDrive:`.
    pub remote: String,
    /// Local side of the sync pair.
    pub local_dir: PathBuf,
    /// Opened by the "web" menu entry.
    pub web_url: String,
}

impl Settings {
    fn default_under(home: &Path) -> Self {
        Self {
            remote: "OneDrive:".to_string(),
            local_dir: home.join("OneDrive"),
            web_url: "https://onedrive.live.com".to_string(),
        }
    }

    /// Load settings, falling back to defaults on a missing or malformed
    /// file. A fresh default file is written so the user has something to
    /// edit.
    pub fn load_or_create(settings_file: &Path, home: &Path) -> Self {
        match Self::load_from_file(settings_file) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(
                    "Could not load settings from {} ({}); using defaults",
                    settings_file.display(),
                    e
                );
                let default = Self::default_under(home);
                if let Err(e) = default.save_to_file(settings_file) {
                    warn!("Could not write default settings: {}", e);
                }
                default
            }
        }
    }

    pub fn load_from_file(settings_file: &Path) -> Result<Self> {
        if !settings_file.exists() {
            return Err(anyhow!("Settings file not found"));
        }
        let data = fs::read_to_string(settings_file)
            .with_context(|| format!("Failed to read {}", settings_file.display()))?;
        let settings: Self = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", settings_file.display()))?;
        Ok(settings)
    }

    pub fn save_to_file(&self, settings_file: &Path) -> Result<()> {
        if let Some(parent) = settings_file.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(settings_file, data)
            .with_context(|| format!("Failed to write {}", settings_file.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_under_home() {
        let paths = Paths::under(Path::new("/home/test"));
        assert_eq!(
            paths.status_file,
            PathBuf::from("/home/test/.cache/rclone-onedrive.status")
        );
        assert_eq!(
            paths.timer_unit,
            PathBuf::from("/home/test/.config/systemd/user/rclone-onedrive.timer")
        );
        assert_eq!(
            paths.settings_file,
            PathBuf::from("/home/test/.config/rclone-tray/settings.json")
        );
    }

    #[test]
    fn test_settings_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let settings_file = temp_dir.path().join("settings.json");

        let original = Settings {
            remote: "Work:".to_string(),
            local_dir: PathBuf::from("/data/onedrive"),
            web_url: "https://example.com".to_string(),
        };
        original.save_to_file(&settings_file).unwrap();

        let loaded = Settings::load_from_file(&settings_file).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings_file = temp_dir.path().join("nested").join("settings.json");

        let settings = Settings::load_or_create(&settings_file, temp_dir.path());
        assert_eq!(settings.remote, "OneDrive:");
        assert_eq!(settings.local_dir, temp_dir.path().join("OneDrive"));
        assert!(settings_file.exists());
    }

    #[test]
    fn test_load_or_create_survives_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings_file = temp_dir.path().join("settings.json");
        fs::write(&settings_file, "{ not json }").unwrap();

        let settings = Settings::load_or_create(&settings_file, temp_dir.path());
        assert_eq!(settings.web_url, "https://onedrive.live.com");
    }
}
