use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::Writer, FmtContext, FormatEvent, FormatFields, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;

/// Log line layout used by the CLI:
/// `[TIMESTAMP] [LEVEL] [SCOPE] [TARGET: FILE:LINE]: MESSAGE`
///
/// SCOPE is the innermost span together with its fields, e.g.
/// `inspect_dataset{root=/data/train}`, so every line of one inspection run
/// names the dataset it belongs to. Outside a span it is the last module of
/// the target.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "[{}] ", now.format("%Y-%m-%dT%H:%M:%S%.6f%:z"))?;
        write!(writer, "[{:5}] ", metadata.level())?;

        match ctx.lookup_current() {
            Some(span) => {
                write!(writer, "[{}", span.name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                write!(writer, "] ")?;
            }
            None => {
                let module = metadata.target().rsplit("::").next().unwrap_or("unknown");
                write!(writer, "[{}] ", module)?;
            }
        }

        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?;
        } else {
            write!(writer, "[{}]: ", metadata.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
