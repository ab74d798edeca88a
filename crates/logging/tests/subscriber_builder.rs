// crates/logging/tests/subscriber_builder.rs

use logging::{HostSink, LogFormat, PluginLevel, StderrMode, SubscriberConfig};
use std::path::PathBuf;

#[test]
fn builder_sets_fields() {
    let cfg = SubscriberConfig::builder()
        .format(LogFormat::Json)
        .verbose(2)
        .quiet(true)
        .stderr(StderrMode::All)
        .log_file(Some((PathBuf::from("log"), Some(LogFormat::Text))))
        .syslog(true)
        .colored(false)
        .timestamps(true)
        .component("auth-script")
        .host(Some(HostSink::new(|_: PluginLevel, _: &str, _: &str| {})))
        .build();

    assert_eq!(cfg.format, LogFormat::Json);
    assert_eq!(cfg.verbose, 2);
    assert!(cfg.quiet);
    assert_eq!(cfg.stderr, StderrMode::All);
    assert!(cfg.log_file.is_some());
    assert!(cfg.syslog);
    assert!(!cfg.colored);
    assert!(cfg.timestamps);
    assert_eq!(cfg.component.as_deref(), Some("auth-script"));
    assert!(cfg.host.is_some());
}

#[test]
fn defaults_write_errors_to_stderr() {
    let cfg = SubscriberConfig::default();
    assert_eq!(cfg.stderr, StderrMode::Errors);
    assert_eq!(cfg.format, LogFormat::Text);
    assert!(cfg.host.is_none());
}
