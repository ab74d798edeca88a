// tests/plugin.rs
#![cfg(unix)]

use auth_script::{
    ConfigError, Environment, EventType, MIN_STRUCT_VERSION, OpenError, Plugin, PluginConfig,
    Status, min_version_required,
};
use dispatch::{Errno, Fork, ForkResult};
use logging::{HostSink, PluginLevel};
use serial_test::serial;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

mod common;
use common::wait_for_line;

type Records = Arc<Mutex<Vec<(PluginLevel, String, String)>>>;

fn recording_config() -> (PluginConfig, Records) {
    let records: Records = Arc::default();
    let out = records.clone();
    let sink = HostSink::new(move |level: PluginLevel, component: &str, msg: &str| {
        out.lock()
            .unwrap()
            .push((level, component.to_string(), msg.to_string()));
    });
    (PluginConfig::builder().host(sink).build(), records)
}

fn shell_args(script: &str) -> [&str; 4] {
    ["auth-script.so", "/bin/sh", "-c", script]
}

fn control_env(control: &Path) -> Environment {
    [
        ("PATH", "/usr/bin:/bin"),
        ("username", "alice"),
        ("auth_control_file", control.to_str().unwrap()),
    ]
    .into_iter()
    .collect()
}

struct FailingFork;

impl Fork for FailingFork {
    fn fork(&self) -> nix::Result<ForkResult> {
        Err(Errno::EAGAIN)
    }
}

#[test]
fn requires_api_version_three() {
    assert_eq!(min_version_required(), 3);
}

#[test]
fn open_logs_banner_and_registers_for_auth() {
    let (cfg, records) = recording_config();
    let opened =
        Plugin::open_with_config(MIN_STRUCT_VERSION, ["auth-script.so", "/opt/verify"], &cfg)
            .unwrap();
    assert_eq!(opened.type_mask, 1 << 5);
    assert_eq!(opened.plugin.context().command_path(), "/opt/verify");

    let records = records.lock().unwrap();
    let notes: Vec<_> = records
        .iter()
        .filter(|(level, _, _)| *level == PluginLevel::Note)
        .map(|(_, _, msg)| msg.as_str())
        .collect();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0], format!("Version: [{}]", env!("CARGO_PKG_VERSION")));
    assert!(notes[1].starts_with("Commit Hash: ["));
    assert!(notes[2].starts_with("Build Time: ["));
    assert!(records.iter().all(|(_, component, _)| component == "auth-script"));
    assert!(
        records
            .iter()
            .any(|(level, _, msg)| *level == PluginLevel::Debug && msg == "script_path=/opt/verify")
    );
    assert_eq!(
        records.last().map(|(_, _, msg)| msg.as_str()),
        Some("plugin initialized successfully")
    );
}

#[test]
fn open_without_command_fails() {
    let cases: &[&[&str]] = &[&["auth-script.so"], &["auth-script.so", ""]];
    for args in cases {
        let (cfg, records) = recording_config();
        let err = Plugin::open_with_config(MIN_STRUCT_VERSION, args.iter().copied(), &cfg)
            .unwrap_err();
        assert!(matches!(err, OpenError::Config(ConfigError::NoCommand)));
        assert!(records.lock().unwrap().iter().any(|(level, _, msg)| {
            *level == PluginLevel::Error && msg == "no script_path specified in config file"
        }));
    }
}

#[test]
fn open_rejects_old_struct_version() {
    let (cfg, _) = recording_config();
    let err = Plugin::open_with_config(
        MIN_STRUCT_VERSION - 1,
        ["auth-script.so", "/opt/verify"],
        &cfg,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        OpenError::Config(ConfigError::StructVersion { .. })
    ));
}

#[test]
#[serial]
fn auth_event_is_deferred_and_reported_out_of_band() {
    let dir = tempdir().unwrap();
    let control = dir.path().join("acf");
    let opened = Plugin::open_with_config(
        MIN_STRUCT_VERSION,
        shell_args("echo 1 > \"$auth_control_file\""),
        &PluginConfig::default(),
    )
    .unwrap();

    let status = opened.plugin.invoke(
        MIN_STRUCT_VERSION,
        EventType::AuthUserPassVerify,
        &control_env(&control),
    );
    assert_eq!(status, Status::Deferred);
    opened.plugin.close();
    assert_eq!(
        wait_for_line(&control, Duration::from_secs(5)).as_deref(),
        Some("1\n")
    );
}

#[test]
#[serial]
fn other_events_succeed_without_launching() {
    let dir = tempdir().unwrap();
    let control = dir.path().join("acf");
    let opened = Plugin::open_with_config(
        MIN_STRUCT_VERSION,
        shell_args("echo 1 > \"$auth_control_file\""),
        &PluginConfig::default(),
    )
    .unwrap();

    for event in [EventType::Up, EventType::ClientConnect, EventType::TlsVerify] {
        let status = opened
            .plugin
            .invoke(MIN_STRUCT_VERSION, event, &control_env(&control));
        assert_eq!(status, Status::Success);
    }
    thread::sleep(Duration::from_millis(200));
    assert!(!control.exists());
}

#[test]
fn invoke_rejects_old_struct_version() {
    let opened = Plugin::open_with_config(
        MIN_STRUCT_VERSION,
        shell_args("exit 0"),
        &PluginConfig::default(),
    )
    .unwrap();
    let status = opened.plugin.invoke(
        MIN_STRUCT_VERSION - 1,
        EventType::AuthUserPassVerify,
        &Environment::new(),
    );
    assert_eq!(status, Status::Error);
}

#[test]
fn spawn_failure_is_an_error_status() {
    let (cfg, records) = recording_config();
    let opened =
        Plugin::open_with_config(MIN_STRUCT_VERSION, shell_args("exit 0"), &cfg).unwrap();
    let plugin = opened.plugin.with_fork(FailingFork);
    let status = plugin.invoke(
        MIN_STRUCT_VERSION,
        EventType::AuthUserPassVerify,
        &Environment::new(),
    );
    assert_eq!(status, Status::Error);
    assert!(records.lock().unwrap().iter().any(|(level, _, msg)| {
        *level == PluginLevel::Error && msg.starts_with("fork failed: ")
    }));
}

#[test]
#[serial]
fn concurrent_invocations_share_one_plugin() {
    let dir = tempdir().unwrap();
    let opened = Plugin::open_with_config(
        MIN_STRUCT_VERSION,
        shell_args("echo \"$username\" > \"$auth_control_file\""),
        &PluginConfig::default(),
    )
    .unwrap();
    let plugin = &opened.plugin;
    let controls: Vec<_> = (0..6).map(|i| dir.path().join(format!("acf-{i}"))).collect();

    thread::scope(|s| {
        for (i, control) in controls.iter().enumerate() {
            s.spawn(move || {
                let mut env = control_env(control);
                env.insert("username", &format!("user-{i}"));
                let status = plugin.invoke(MIN_STRUCT_VERSION, EventType::AuthUserPassVerify, &env);
                assert_eq!(status, Status::Deferred);
            });
        }
    });

    for (i, control) in controls.iter().enumerate() {
        assert_eq!(
            wait_for_line(control, Duration::from_secs(5)),
            Some(format!("user-{i}\n"))
        );
    }
}
