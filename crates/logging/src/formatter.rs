// crates/logging/src/formatter.rs
use std::fmt;
use time::{OffsetDateTime, macros::format_description};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, format::Writer};
use tracing_subscriber::registry::LookupSpan;

use crate::host::PluginLevel;

/// Plain-text event format: `[timestamp ]LEVEL component: message`.
///
/// Levels are rendered with the host's vocabulary (`DEBUG`, `NOTE`,
/// `ERROR`) so console output lines up with what the host itself logs.
pub struct PluginFormatter {
    component: Option<String>,
    timestamps: bool,
}

impl PluginFormatter {
    pub fn new(component: Option<String>, timestamps: bool) -> Self {
        Self {
            component,
            timestamps,
        }
    }

    fn timestamp() -> Result<String, fmt::Error> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(format_description!(
            "[year]/[month]/[day] [hour]:[minute]:[second]"
        ))
        .map_err(|_| fmt::Error)
    }
}

impl<S, N> FormatEvent<S, N> for PluginFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if self.timestamps {
            write!(writer, "{} ", Self::timestamp()?)?;
        }
        let meta = event.metadata();
        let component = self.component.as_deref().unwrap_or_else(|| meta.target());
        write!(writer, "{} {component}: ", PluginLevel::from(*meta.level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
