// crates/logging/src/subscriber.rs
#![allow(missing_docs)]

use crate::flags::{LogFormat, StderrMode, SubscriberConfig};
use crate::formatter::PluginFormatter;
use crate::host::HostLayer;
use crate::json_format::JsonFormatter;
use crate::sink::{FileWriter, LogWriter};
use std::fs::OpenOptions;
use std::io;
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    EnvFilter, fmt as tracing_fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

#[cfg(all(unix, feature = "syslog"))]
use std::os::unix::net::UnixDatagram;
#[cfg(all(unix, feature = "syslog"))]
use std::path::PathBuf;
#[cfg(all(unix, feature = "syslog"))]
use tracing::{Event, Level};
#[cfg(all(unix, feature = "syslog"))]
use tracing_subscriber::layer::Context;

#[cfg(all(unix, feature = "syslog"))]
use crate::host::MessageVisitor;

#[cfg(all(unix, feature = "syslog"))]
struct SyslogLayer {
    sock: UnixDatagram,
    tag: String,
}

#[cfg(all(unix, feature = "syslog"))]
impl SyslogLayer {
    fn new(tag: String) -> io::Result<Self> {
        let path = std::env::var_os("AUTH_SCRIPT_SYSLOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/dev/log"));
        let sock = UnixDatagram::unbound()?;
        sock.connect(path)?;
        Ok(Self { sock, tag })
    }
}

#[cfg(all(unix, feature = "syslog"))]
fn syslog_severity(level: Level) -> u8 {
    match level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 5,
        Level::DEBUG | Level::TRACE => 7,
    }
}

#[cfg(all(unix, feature = "syslog"))]
impl<S> Layer<S> for SyslogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let msg = MessageVisitor::render(event);
        // facility "auth" (4)
        let pri = 4 * 8 + syslog_severity(*event.metadata().level());
        let pid = std::process::id();
        let data = format!("<{pri}>{}[{pid}]: {msg}", self.tag);
        let _ = self.sock.send(data.as_bytes());
    }
}

fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else if verbose > 2 {
        LevelFilter::TRACE
    } else if verbose > 1 {
        LevelFilter::DEBUG
    } else if verbose > 0 {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

fn format_layer<S, W>(
    writer: W,
    format: LogFormat,
    component: Option<String>,
    timestamps: bool,
    ansi: bool,
) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Json => base.event_format(JsonFormatter::new(component)).boxed(),
        LogFormat::Text => base
            .event_format(PluginFormatter::new(component, timestamps))
            .boxed(),
    }
}

pub fn subscriber(cfg: SubscriberConfig) -> io::Result<Box<dyn Subscriber + Send + Sync>> {
    let SubscriberConfig {
        format,
        verbose,
        quiet,
        stderr,
        log_file,
        syslog,
        colored,
        timestamps,
        component,
        host,
    } = cfg;

    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(verbose, quiet).into())
        .from_env_lossy();

    let console = match stderr {
        StderrMode::Off => None,
        mode => Some(format_layer(
            LogWriter { mode },
            format,
            component.clone(),
            timestamps,
            colored,
        )),
    };

    let host_layer = host.map(|sink| HostLayer::new(sink, component.clone()));

    #[cfg(all(unix, feature = "syslog"))]
    let syslog_layer = if syslog {
        let tag = component.clone().unwrap_or_else(|| "auth-script".to_string());
        SyslogLayer::new(tag).ok()
    } else {
        None
    };
    #[cfg(not(all(unix, feature = "syslog")))]
    let syslog_layer: Option<tracing_subscriber::layer::Identity> = {
        let _ = syslog;
        None
    };

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(host_layer)
        .with(syslog_layer);

    let file_layer = if let Some((path, file_format)) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Some(format_layer(
            FileWriter { file },
            file_format.unwrap_or(format),
            component,
            true,
            false,
        ))
    } else {
        None
    };
    let registry = registry.with(file_layer);
    Ok(Box::new(registry))
}

/// Build a [`Dispatch`] that can be handed around and entered with
/// `tracing::dispatcher::with_default` instead of installing a global
/// subscriber.
pub fn dispatch(cfg: SubscriberConfig) -> io::Result<Dispatch> {
    Ok(Dispatch::new(subscriber(cfg)?))
}

pub fn init(cfg: SubscriberConfig) -> io::Result<()> {
    subscriber(cfg)?.init();
    Ok(())
}
