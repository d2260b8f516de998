//! Bridge from tracing to the dispatcher

use crate::{Dispatcher, Level, Record, Result};
use std::fmt::Write;
use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::{Layer, layer::Context, prelude::*, registry::LookupSpan};

/// A tracing layer that publishes events into a [`Dispatcher`]
pub struct TracingBridge {
    dispatcher: Dispatcher,
}

impl TracingBridge {
    /// Create a new tracing bridge
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl<S> Layer<S> for TracingBridge
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let level = map_level(*event.metadata().level());

        if !self.dispatcher.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut span_context = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                span_context.push(span.name());
            }
        }

        let message = if span_context.is_empty() {
            visitor.finish()
        } else {
            format!("{}: {}", span_context.join("::"), visitor.finish())
        };

        let metadata = event.metadata();
        let mut record = Record::new(level, message).with_logger(metadata.target());

        if let (Some(file), Some(line)) = (metadata.file(), metadata.line()) {
            record = record.with_location(file, line);
        }

        self.dispatcher.log(record);
    }
}

fn map_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Info,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::TRACE => Level::Trace,
    }
}

/// Visitor to extract the message and remaining fields from an event
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.push_field(field.name(), value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push_field(field.name(), value);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.push_field(field.name(), value);
    }
}

/// Initialize tracing to publish into `dispatcher`
///
/// This sets the global default subscriber to a registry carrying a
/// [`TracingBridge`].
///
/// # Errors
///
/// Fails if a global subscriber is already set.
///
/// # Example
/// ```no_run
/// use streamlog_logger::{Dispatcher, compat::tracing_bridge::init_tracing_bridge};
///
/// init_tracing_bridge(Dispatcher::global()).expect("Failed to set tracing bridge");
/// ```
pub fn init_tracing_bridge(dispatcher: &Dispatcher) -> Result<()> {
    let subscriber = tracing_subscriber::registry().with(TracingBridge::new(dispatcher.clone()));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
