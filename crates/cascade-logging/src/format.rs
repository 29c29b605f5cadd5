//! Single-line event format.
//!
//! ```text
//! 2024-03-07 14:05:09.123456 INFO   [trigger.rest] - Trigger started port=8080
//! ```
//!
//! The bracketed name is the `logger` field set by [`crate::NamedLogger`],
//! or the event target for events emitted directly through `tracing`.

use std::fmt::{self, Write as _};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::level::Level;

/// Timestamp layout, microsecond precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Event formatter producing `timestamp LEVEL [name] - message`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = LineFields::default();
        event.record(&mut fields);

        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        let name = fields.logger.as_deref().unwrap_or_else(|| metadata.target());

        writeln!(
            writer,
            "{} {:<6} [{}] - {}{}",
            Local::now().format(TIMESTAMP_FORMAT),
            level.label(),
            name,
            strip_brackets(&fields.message),
            fields.extra
        )
    }
}

/// Remove one pair of surrounding square brackets
pub fn strip_brackets(message: &str) -> &str {
    message
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(message)
}

#[derive(Default)]
struct LineFields {
    logger: Option<String>,
    message: String,
    extra: String,
}

impl Visit for LineFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "logger" => self.logger = Some(value.to_string()),
            "message" => self.message = value.to_string(),
            name => {
                let _ = write!(self.extra, " {}={}", name, value);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "logger" => self.logger = Some(format!("{:?}", value)),
            name => {
                let _ = write!(self.extra, " {}={:?}", name, value);
            }
        }
    }
}
