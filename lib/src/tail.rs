// SPDX-License-Identifier: MPL-2.0

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Upper bound on how much of the log is read to recover a line window.
/// The windows the applet asks for (15 and 50 lines of rclone output) fit
/// comfortably in this.
const TAIL_CHUNK: u64 = 64 * 1024;

/// Return up to the last `max_lines` lines of `path`, oldest first.
///
/// Fails open: a missing or unreadable file yields an empty window.
pub fn tail_lines(path: &Path, max_lines: usize) -> Vec<String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return Vec::new(),
    };
    let len = match file.metadata() {
        Ok(meta) => meta.len(),
        Err(_) => return Vec::new(),
    };
    let start = len.saturating_sub(TAIL_CHUNK);
    if file.seek(SeekFrom::Start(start)).is_err() {
        return Vec::new();
    }
    let mut buf = Vec::with_capacity((len - start) as usize);
    if file.read_to_end(&mut buf).is_err() {
        return Vec::new();
    }
    let text = String::from_utf8_lossy(&buf);
    let mut lines: Vec<&str> = text.lines().collect();
    // Seeking into the middle of the file usually lands mid-line; drop the
    // leading fragment.
    if start > 0 && !lines.is_empty() {
        lines.remove(0);
    }
    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].iter().map(|s| s.to_string()).collect()
}
