// crates/logging/tests/levels.rs
use logging::{LogFormat, StderrMode, SubscriberConfig, subscriber};
use tracing::Level;
use tracing::subscriber::with_default;

fn sub(verbose: u8, quiet: bool) -> Box<dyn tracing::Subscriber + Send + Sync> {
    let cfg = SubscriberConfig::builder()
        .format(LogFormat::Text)
        .verbose(verbose)
        .quiet(quiet)
        .stderr(StderrMode::Off)
        .build();
    subscriber(cfg).unwrap()
}

#[test]
fn info_not_emitted_by_default() {
    with_default(sub(0, false), || {
        assert!(tracing::enabled!(Level::WARN));
        assert!(!tracing::enabled!(Level::INFO));
    });
}

#[test]
fn verbose_enables_info() {
    with_default(sub(1, false), || {
        assert!(tracing::enabled!(Level::INFO));
        assert!(!tracing::enabled!(Level::DEBUG));
    });
}

#[test]
fn debug_with_two_v() {
    with_default(sub(2, false), || {
        assert!(tracing::enabled!(Level::DEBUG));
    });
}

#[test]
fn quiet_only_errors() {
    with_default(sub(2, true), || {
        assert!(tracing::enabled!(Level::ERROR));
        assert!(!tracing::enabled!(Level::WARN));
    });
}
