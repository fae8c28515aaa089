#![allow(dead_code)]

use std::{
    fs,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use assert_cmd::Command;
use nix::{
    sys::signal::{self, Signal},
    unistd::Pid,
};

/// `dutil` with a clean logging environment.
pub fn dutil() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dutil"));
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn wait_for_lines(path: &Path, expected: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(content) = fs::read_to_string(path) {
            let lines: Vec<_> = content.lines().map(|line| line.to_string()).collect();
            if lines.len() >= expected {
                return lines;
            }
        }

        if Instant::now() >= deadline {
            panic!("Timed out waiting for {expected} lines in {:?}", path);
        }

        thread::sleep(Duration::from_millis(100));
    }
}

pub fn wait_for_pid_file(path: &Path) -> i32 {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(content) = fs::read_to_string(path)
            && let Ok(pid) = content.trim().parse::<i32>()
        {
            return pid;
        }

        if Instant::now() >= deadline {
            panic!("Timed out waiting for a pid in {:?}", path);
        }

        thread::sleep(Duration::from_millis(100));
    }
}

pub fn is_process_alive(pid: i32) -> bool {
    signal::kill(Pid::from_raw(pid), None).is_ok()
}

pub fn terminate(pid: i32) {
    let _ = signal::kill(Pid::from_raw(pid), Signal::SIGTERM);
}
