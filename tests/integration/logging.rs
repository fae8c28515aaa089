use std::fs;

use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::tempdir;

use crate::common::dutil;

fn timestamped(label: &str, message: &str) -> Regex {
    Regex::new(&format!(
        r"(?m)^ \d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}} {label} {message}$"
    ))
    .unwrap()
}

#[test]
fn file_backend_receives_every_message() {
    let temp = tempdir().expect("failed to create tempdir");
    let log_path = temp.path().join("x.log");

    dutil()
        .arg("--log-file")
        .arg(&log_path)
        .arg("hello world")
        .arg("second")
        .assert()
        .success()
        .stderr(contains("hello world").not());

    let content = fs::read_to_string(&log_path).expect("read log file");
    assert_eq!(content.lines().count(), 2, "{content}");
    assert!(timestamped("INFO:", "hello world").is_match(&content));
    assert!(timestamped("INFO:", "second").is_match(&content));
}

#[test]
fn piped_stderr_is_never_colored() {
    let output = dutil()
        .arg("hello console")
        .assert()
        .success()
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8(output).expect("utf8 stderr");
    assert!(!stderr.contains('\x1b'), "{stderr:?}");
    assert!(timestamped("INFO:", "hello console").is_match(&stderr), "{stderr}");
}

#[test]
fn platform_backend_forwards_to_host_sink() {
    let temp = tempdir().expect("failed to create tempdir");
    let log_path = temp.path().join("ignored.log");

    dutil()
        .arg("--platform-log")
        .arg("--log-file")
        .arg(&log_path)
        .arg("hello platform")
        .assert()
        .success()
        .stdout(contains("hello platform"))
        .stderr(contains("INFO: hello platform").not());

    assert!(!log_path.exists());
}

#[test]
fn config_file_selects_file_backend() {
    let temp = tempdir().expect("failed to create tempdir");
    let log_path = temp.path().join("from-config.log");
    let config_path = temp.path().join("dutil.yaml");
    fs::write(
        &config_path,
        format!("log:\n  file: {}\nnofile: 64\n", log_path.display()),
    )
    .expect("write config");

    dutil()
        .arg("-c")
        .arg(&config_path)
        .arg("configured")
        .assert()
        .success();

    let content = fs::read_to_string(&log_path).expect("read log file");
    assert!(timestamped("INFO:", r"set open file limit to \d+").is_match(&content));
    assert!(timestamped("INFO:", "configured").is_match(&content));
}

#[test]
fn missing_config_file_is_reported() {
    let temp = tempdir().expect("failed to create tempdir");

    dutil()
        .arg("-c")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(contains("missing.yaml"));
}

#[test]
fn unopenable_log_file_fails_startup() {
    let temp = tempdir().expect("failed to create tempdir");

    dutil()
        .arg("--log-file")
        .arg(temp.path().join("no/such/dir/x.log"))
        .arg("never written")
        .assert()
        .failure()
        .stdout(contains("Failed to configure logging"));
}
