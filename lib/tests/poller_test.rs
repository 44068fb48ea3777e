// SPDX-License-Identifier: MPL-2.0

//! End-to-end checks of one poll observation over a fake home directory:
//! classify the status marker, tail the log, extract progress and the last
//! success, read the timer interval.

use rclone_tray_lib::{next_delay, poll, progress, status, tail, timer, Paths, ProgressSnapshot, SyncState};
use std::fs;
use tempfile::TempDir;

const PROGRESS_WINDOW: usize = 15;
const SUCCESS_WINDOW: usize = 50;

fn fake_home() -> (TempDir, Paths) {
    let home = TempDir::new().unwrap();
    let paths = Paths::under(home.path());
    fs::create_dir_all(paths.status_file.parent().unwrap()).unwrap();
    fs::create_dir_all(paths.timer_unit.parent().unwrap()).unwrap();
    (home, paths)
}

#[test]
fn observation_of_a_mid_sync_home() {
    let (_home, paths) = fake_home();
    fs::write(&paths.status_file, "SYNCING\n").unwrap();
    fs::write(
        &paths.log_file,
        "2024/03/01 09:00:00 INFO  : Bisync successful\n\
         2024/03/01 10:00:00 INFO  : Checks:    12 / 50\n\
         2024/03/01 10:00:05 INFO  : Transferred:   36.5 MiB / 50 MiB, 73%, 4.2MB/s, ETA 2m\n",
    )
    .unwrap();
    fs::write(&paths.timer_unit, "[Timer]\nOnUnitActiveSec=30m\n").unwrap();

    let state = status::classify(&paths.status_file);
    assert_eq!(state, SyncState::Syncing);
    assert_eq!(next_delay(&state), poll::SYNCING_DELAY);

    let window = tail::tail_lines(&paths.log_file, PROGRESS_WINDOW);
    assert_eq!(
        progress::extract_progress(&window),
        Some(ProgressSnapshot::Percent {
            percent: "73%".to_string(),
            rate: "4.2MB/s".to_string(),
            eta: "2m".to_string(),
        })
    );

    let window = tail::tail_lines(&paths.log_file, SUCCESS_WINDOW);
    assert_eq!(
        progress::last_success_timestamp(&window),
        Some("2024/03/01 09:00:00".to_string())
    );

    assert_eq!(timer::current_interval(&paths.timer_unit), 30);
}

#[test]
fn observation_of_an_empty_home_fails_open() {
    let (_home, paths) = fake_home();

    let state = status::classify(&paths.status_file);
    assert_eq!(state, SyncState::Idle);
    assert_eq!(next_delay(&state), poll::IDLE_DELAY);

    let window = tail::tail_lines(&paths.log_file, PROGRESS_WINDOW);
    assert!(window.is_empty());
    assert_eq!(progress::extract_progress(&window), None);
    assert_eq!(progress::last_success_timestamp(&window), None);

    assert_eq!(
        timer::current_interval(&paths.timer_unit),
        timer::DEFAULT_INTERVAL_MINUTES
    );
}

#[test]
fn interval_rewrite_preserves_the_rest_of_the_unit() {
    let (_home, paths) = fake_home();
    let original = "[Unit]\n\
        Description=Periodic OneDrive bisync\n\
        \n\
        [Timer]\n\
        OnBootSec=2m\n\
        OnUnitActiveSec=30m\n\
        Persistent=true\n";
    fs::write(&paths.timer_unit, original).unwrap();

    assert!(timer::set_interval(&paths.timer_unit, 10).unwrap());
    let rewritten = fs::read_to_string(&paths.timer_unit).unwrap();
    assert_eq!(
        rewritten,
        original.replace("OnUnitActiveSec=30m", "OnUnitActiveSec=10m")
    );

    // Requesting the value again is a no-op.
    assert!(!timer::set_interval(&paths.timer_unit, 10).unwrap());
}

#[test]
fn success_older_than_the_window_is_invisible() {
    let (_home, paths) = fake_home();
    let mut log = String::from("2024/03/01 09:00:00 INFO  : Bisync successful\n");
    for i in 0..SUCCESS_WINDOW {
        log.push_str(&format!("2024/03/01 10:00:{:02} INFO  : noise\n", i % 60));
    }
    fs::write(&paths.log_file, log).unwrap();

    let window = tail::tail_lines(&paths.log_file, SUCCESS_WINDOW);
    assert_eq!(window.len(), SUCCESS_WINDOW);
    assert_eq!(progress::last_success_timestamp(&window), None);
}
