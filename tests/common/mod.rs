// tests/common/mod.rs
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

pub fn host_cmd() -> Command {
    let mut cmd = Command::cargo_bin("auth-script-host").unwrap();
    cmd.env("LC_ALL", "C").env("LANG", "C").env_remove("RUST_LOG");
    cmd
}

/// Poll until `path` holds a complete line, as written by a detached command.
pub fn wait_for_line(path: &Path, timeout: Duration) -> Option<String> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(contents) = fs::read_to_string(path) {
            if contents.ends_with('\n') {
                return Some(contents);
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
    None
}
