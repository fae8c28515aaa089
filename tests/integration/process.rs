use predicates::prelude::*;
use predicates::str::contains;
#[cfg(target_os = "linux")]
use tempfile::tempdir;

use crate::common::dutil;
#[cfg(target_os = "linux")]
use crate::common::{is_process_alive, terminate, wait_for_lines, wait_for_pid_file};

#[test]
fn unknown_user_terminates_with_error() {
    dutil()
        .arg("--user")
        .arg("nonexistent_user_xyz")
        .arg("after-drop")
        .assert()
        .code(255)
        .stderr(contains("ERROR: User 'nonexistent_user_xyz' not found"))
        .stderr(contains("after-drop").not());
}

#[test]
fn nofile_request_is_logged() {
    dutil()
        .arg("-n")
        .arg("64")
        .assert()
        .success()
        .stderr(contains("INFO: set open file limit to"));
}

#[cfg(target_os = "linux")]
#[test]
fn daemonize_detaches_and_records_pid() {
    let temp = tempdir().expect("failed to create tempdir");
    let pid_path = temp.path().join("dutil.pid");
    let log_path = temp.path().join("dutil.log");

    dutil()
        .arg("--daemonize")
        .arg("--pid-file")
        .arg(&pid_path)
        .arg("--log-file")
        .arg(&log_path)
        .arg("--linger")
        .arg("5")
        .arg("running detached")
        .assert()
        .success();

    let pid = wait_for_pid_file(&pid_path);
    let lines = wait_for_lines(&log_path, 1);
    assert!(
        lines.iter().any(|line| line.ends_with("INFO: running detached")),
        "{lines:?}"
    );
    assert!(is_process_alive(pid));

    terminate(pid);
}
