use std::fmt::Result;

use nu_ansi_term::{AnsiGenericString, Color};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, FormattedFields},
    registry::LookupSpan,
};

struct LogTime;

impl LogTime {
    fn get_time() -> String {
        if cfg!(debug_assertions) {
            chrono::Local::now().format("%m-%d %H:%M:%S%.3f").to_string()
        } else {
            chrono::Utc::now().to_rfc3339()
        }
    }
}

/// `[time][LEVEL][target] span{fields}: message`, coloured when
/// `CONTENT_COLORFUL_LOGS` is set or on debug builds.
pub struct ContentFormatter {
    pub(super) colorful: bool,
}

impl ContentFormatter {
    pub fn from_env() -> Self {
        Self {
            colorful: std::env::var("CONTENT_COLORFUL_LOGS").is_ok() || cfg!(debug_assertions),
        }
    }

    fn format_level(level: &Level) -> AnsiGenericString<'static, str> {
        match *level {
            Level::ERROR => Color::Red.paint("ERROR"),
            Level::WARN => Color::Yellow.paint(" WARN"),
            Level::INFO => Color::Green.paint(" INFO"),
            Level::DEBUG => Color::Blue.paint("DEBUG"),
            Level::TRACE => Color::Purple.paint("TRACE"),
        }
    }

    fn header(&self, meta: &Metadata<'_>) -> String {
        if self.colorful {
            format!(
                "[{}][{}][{}] ",
                Color::DarkGray.paint(LogTime::get_time()),
                Self::format_level(meta.level()),
                Color::LightMagenta.paint(meta.target())
            )
        } else {
            format!("[{}][{:>5}][{}] ", LogTime::get_time(), meta.level().as_str(), meta.target())
        }
    }
}

impl<S, N> FormatEvent<S, N> for ContentFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> Result {
        let normalized_meta = event.normalized_metadata();
        let meta = normalized_meta.as_ref().unwrap_or_else(|| event.metadata());

        write!(writer, "{}", self.header(meta))?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}
