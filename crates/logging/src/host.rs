// crates/logging/src/host.rs
//! Bridge from `tracing` events to the host's leveled log callback.
//!
//! A plugin never owns the terminal or the log files of the process that
//! loaded it. Instead the host hands over a callback taking a level, the
//! name of the component that logged, and a preformatted message.
//! [`HostLayer`] renders every event into that shape.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Severity understood by the host's log callback.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginLevel {
    Debug,
    Note,
    Error,
}

impl PluginLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            PluginLevel::Debug => "DEBUG",
            PluginLevel::Note => "NOTE",
            PluginLevel::Error => "ERROR",
        }
    }
}

impl From<Level> for PluginLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => PluginLevel::Error,
            Level::WARN | Level::INFO => PluginLevel::Note,
            Level::DEBUG | Level::TRACE => PluginLevel::Debug,
        }
    }
}

impl fmt::Display for PluginLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host's logging capability.
///
/// Implementations must tolerate concurrent calls, including calls made from
/// forked children of the process that created them.
pub trait HostLog: Send + Sync {
    fn log(&self, level: PluginLevel, component: &str, message: &str);
}

impl<F> HostLog for F
where
    F: Fn(PluginLevel, &str, &str) + Send + Sync,
{
    fn log(&self, level: PluginLevel, component: &str, message: &str) {
        self(level, component, message)
    }
}

/// A shareable handle to a [`HostLog`], as stored in a subscriber config.
#[derive(Clone)]
pub struct HostSink(Arc<dyn HostLog>);

impl HostSink {
    pub fn new<L: HostLog + 'static>(log: L) -> Self {
        Self(Arc::new(log))
    }

    pub fn log(&self, level: PluginLevel, component: &str, message: &str) {
        self.0.log(level, component, message);
    }
}

impl fmt::Debug for HostSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSink").finish_non_exhaustive()
    }
}

pub(crate) struct MessageVisitor {
    pub(crate) msg: String,
}

impl MessageVisitor {
    pub(crate) fn render(event: &Event<'_>) -> String {
        let mut v = MessageVisitor { msg: String::new() };
        event.record(&mut v);
        if v.msg.is_empty() {
            v.msg.push_str(event.metadata().target());
        }
        v.msg
    }

    fn push(&mut self, field: &Field, value: &str) {
        if !self.msg.is_empty() {
            self.msg.push(' ');
        }
        if field.name() != "message" {
            self.msg.push_str(field.name());
            self.msg.push('=');
        }
        self.msg.push_str(value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, &format!("{value:?}"));
    }
}

/// Forwards each event to a [`HostSink`] under a fixed component name.
///
/// When no component is configured the event's target is used.
pub struct HostLayer {
    sink: HostSink,
    component: Option<String>,
}

impl HostLayer {
    pub fn new(sink: HostSink, component: Option<String>) -> Self {
        Self { sink, component }
    }
}

impl<S> Layer<S> for HostLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let msg = MessageVisitor::render(event);
        let level = PluginLevel::from(*event.metadata().level());
        let component = self
            .component
            .as_deref()
            .unwrap_or_else(|| event.metadata().target());
        self.sink.log(level, component, &msg);
    }
}
