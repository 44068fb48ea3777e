// SPDX-License-Identifier: MPL-2.0

//! Reading and rewriting the `OnUnitActiveSec=` field of the systemd user
//! timer that schedules the sync job. The timer file belongs to the user;
//! everything outside the one field is kept byte-for-byte.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

static INTERVAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"OnUnitActiveSec=(\d+)([mh]?)").unwrap());
// The whole field up to end of line, for rewriting.
static FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"OnUnitActiveSec=[^\n]*").unwrap());

/// Current sync interval in minutes.
///
/// Fails open: a missing, unreadable or unparseable timer file reads as the
/// default interval.
pub fn current_interval(timer_unit: &Path) -> u32 {
    let content = match fs::read_to_string(timer_unit) {
        Ok(content) => content,
        Err(_) => return DEFAULT_INTERVAL_MINUTES,
    };
    match INTERVAL_RE.captures(&content) {
        Some(caps) => {
            let value: u32 = match caps[1].parse() {
                Ok(value) => value,
                Err(_) => return DEFAULT_INTERVAL_MINUTES,
            };
            if &caps[2] == "h" {
                value.saturating_mul(60)
            } else {
                value
            }
        }
        None => DEFAULT_INTERVAL_MINUTES,
    }
}

/// Rewrite the interval field to `{minutes}m`.
///
/// Returns `Ok(false)` without touching the file when the requested value
/// is already in effect. When the field is missing but a `[Timer]` section
/// exists, the field is inserted right after the section header.
pub fn set_interval(timer_unit: &Path, minutes: u32) -> Result<bool> {
    if !timer_unit.exists() {
        bail!("Timer unit not found: {}", timer_unit.display());
    }
    if current_interval(timer_unit) == minutes {
        return Ok(false);
    }
    let content = fs::read_to_string(timer_unit)
        .with_context(|| format!("Failed to read timer unit {}", timer_unit.display()))?;
    let field = format!("OnUnitActiveSec={}m", minutes);
    let updated = if FIELD_RE.is_match(&content) {
        FIELD_RE.replace(&content, field.as_str()).into_owned()
    } else if content.contains("[Timer]") {
        content.replacen("[Timer]", &format!("[Timer]\n{}", field), 1)
    } else {
        bail!("No [Timer] section in {}", timer_unit.display());
    };
    fs::write(timer_unit, updated)
        .with_context(|| format!("Failed to write timer unit {}", timer_unit.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TIMER_UNIT: &str = "[Unit]\n\
        Description=Periodic OneDrive bisync\n\
        \n\
        [Timer]\n\
        OnBootSec=2m\n\
        OnUnitActiveSec=30m\n\
        Persistent=true\n\
        \n\
        [Install]\n\
        WantedBy=timers.target\n";

    fn unit(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("rclone-onedrive.timer");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_current_interval_minutes() {
        let dir = TempDir::new().unwrap();
        assert_eq!(current_interval(&unit(&dir, TIMER_UNIT)), 30);
    }

    #[test]
    fn test_current_interval_hours_are_converted() {
        let dir = TempDir::new().unwrap();
        let path = unit(&dir, "[Timer]\nOnUnitActiveSec=2h\n");
        assert_eq!(current_interval(&path), 120);
    }

    #[test]
    fn test_current_interval_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            current_interval(&dir.path().join("missing.timer")),
            DEFAULT_INTERVAL_MINUTES
        );
        let path = unit(&dir, "[Timer]\nOnBootSec=2m\n");
        assert_eq!(current_interval(&path), DEFAULT_INTERVAL_MINUTES);
    }

    #[test]
    fn test_set_interval_rewrites_only_the_target_field() {
        let dir = TempDir::new().unwrap();
        let path = unit(&dir, TIMER_UNIT);

        assert!(set_interval(&path, 10).unwrap());

        let rewritten = fs::read_to_string(&path).unwrap();
        assert_eq!(rewritten, TIMER_UNIT.replace("OnUnitActiveSec=30m", "OnUnitActiveSec=10m"));
        assert_eq!(current_interval(&path), 10);
    }

    #[test]
    fn test_set_interval_same_value_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let path = unit(&dir, TIMER_UNIT);

        // Make any write attempt fail so the no-op claim is actually checked.
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        assert!(!set_interval(&path, 30).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), TIMER_UNIT);
    }

    #[test]
    fn test_set_interval_inserts_field_after_timer_section() {
        let dir = TempDir::new().unwrap();
        let path = unit(&dir, "[Unit]\nDescription=x\n\n[Timer]\nOnBootSec=2m\n");

        assert!(set_interval(&path, 60).unwrap());

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("[Timer]\nOnUnitActiveSec=60m\nOnBootSec=2m"));
    }

    #[test]
    fn test_set_interval_errors_without_timer_section() {
        let dir = TempDir::new().unwrap();
        let path = unit(&dir, "[Unit]\nDescription=x\n");
        assert!(set_interval(&path, 10).is_err());
    }

    #[test]
    fn test_set_interval_errors_on_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(set_interval(&dir.path().join("missing.timer"), 10).is_err());
    }
}
