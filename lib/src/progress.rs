// SPDX-License-Identifier: MPL-2.0

//! Pattern matching over the tail of the rclone log.
//!
//! Rclone interleaves transfer summaries and check counters while a bisync
//! run is active; the applet only lifts the most recent parseable fragment
//! out of the window. Tokens are kept verbatim as strings, no unit
//! conversion happens here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}%).*?([\d.]+\s?\w+/s).*?ETA\s?([\w\d]+)").unwrap());
static CHECKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Checks:\s+(\d+)\s?/\s?(\d+)").unwrap());
static SUCCESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}).*Bisync successful").unwrap());

/// The most recent parseable progress fragment of a running sync.
/// Recomputed on every poll, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressSnapshot {
    /// A transfer summary line: percentage, rate and ETA, verbatim.
    Percent {
        percent: String,
        rate: String,
        eta: String,
    },
    /// The comparison phase counter before transfers start.
    Comparing { done: u64, total: u64 },
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressSnapshot::Percent { percent, rate, eta } => {
                write!(f, "{} ({} - {})", percent, rate, eta)
            }
            ProgressSnapshot::Comparing { done, total } => {
                write!(f, "Comparing changes: {}/{}", done, total)
            }
        }
    }
}

/// Scan a log tail (oldest first) for the freshest progress fragment.
///
/// A transfer-percentage line always wins over a comparison counter; within
/// each kind the most recent matching line wins. `None` means the run is
/// still starting and has produced nothing parseable yet.
pub fn extract_progress(lines: &[String]) -> Option<ProgressSnapshot> {
    for line in lines.iter().rev() {
        if line.contains("Transferred:") && line.contains('%') {
            if let Some(caps) = PERCENT_RE.captures(line) {
                return Some(ProgressSnapshot::Percent {
                    percent: caps[1].to_string(),
                    rate: caps[2].replace(' ', ""),
                    eta: caps[3].to_string(),
                });
            }
        }
    }
    for line in lines.iter().rev() {
        if line.contains("Checks:") {
            if let Some(caps) = CHECKS_RE.captures(line) {
                let done = caps[1].parse().ok()?;
                let total = caps[2].parse().ok()?;
                return Some(ProgressSnapshot::Comparing { done, total });
            }
        }
    }
    None
}

/// Latest success timestamp within the window, `None` when no success line
/// is visible. Successes older than the window are invisible; that is a
/// documented limit of tailing, not something this function papers over.
pub fn last_success_timestamp(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .rev()
        .find_map(|line| SUCCESS_RE.captures(line).map(|caps| caps[1].to_string()))
}
