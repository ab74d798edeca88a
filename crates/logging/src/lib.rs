// crates/logging/src/lib.rs
//! Logging for the plugin and its host driver.
//!
//! Everything is built on `tracing`. A [`SubscriberConfig`] describes where
//! events go (stderr, a log file, syslog, the host's own log callback) and
//! [`subscriber`]/[`dispatch`] assemble the matching layers.

mod flags;
mod formatter;
mod host;
mod json_format;
mod sink;
mod subscriber;

pub use flags::{LogFormat, StderrMode, SubscriberConfig, SubscriberConfigBuilder};
pub use formatter::PluginFormatter;
pub use host::{HostLayer, HostLog, HostSink, PluginLevel};
pub use json_format::JsonFormatter;
pub use subscriber::{dispatch, init, subscriber};
