//! Named logger handle

use crate::{Dispatcher, Level, Record};
use std::borrow::Cow;

/// A named entry point into a [`Dispatcher`].
///
/// Cheap to clone. The name ends up in [`Record::logger`].
#[derive(Clone)]
pub struct Logger {
    name: Cow<'static, str>,
    dispatcher: Dispatcher,
}

impl Logger {
    /// Create a logger publishing into `dispatcher`
    pub fn new(name: impl Into<Cow<'static, str>>, dispatcher: Dispatcher) -> Self {
        Self {
            name: name.into(),
            dispatcher,
        }
    }

    /// The logger's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dispatcher this logger publishes into
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Check if a level would pass the root filter
    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.dispatcher.is_enabled(level)
    }

    /// Log a message with no caller location
    pub fn log(&self, level: Level, msg: impl Into<String>) {
        if self.is_enabled(level) {
            self.dispatcher
                .log(Record::new(level, msg).with_logger(self.name.clone()));
        }
    }

    /// Log a message with an explicit caller location
    pub fn log_at(
        &self,
        level: Level,
        file: impl Into<Cow<'static, str>>,
        line: u32,
        msg: impl Into<String>,
    ) {
        if self.is_enabled(level) {
            self.dispatcher.log(
                Record::new(level, msg)
                    .with_logger(self.name.clone())
                    .with_location(file, line),
            );
        }
    }

    /// Log an error
    #[inline]
    pub fn error(&self, msg: impl Into<String>) {
        self.log(Level::Error, msg);
    }

    /// Log a warning
    #[inline]
    pub fn warn(&self, msg: impl Into<String>) {
        self.log(Level::Warn, msg);
    }

    /// Log info
    #[inline]
    pub fn info(&self, msg: impl Into<String>) {
        self.log(Level::Info, msg);
    }

    /// Log debug
    #[inline]
    pub fn debug(&self, msg: impl Into<String>) {
        self.log(Level::Debug, msg);
    }

    /// Log trace
    #[inline]
    pub fn trace(&self, msg: impl Into<String>) {
        self.log(Level::Trace, msg);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("name", &self.name).finish()
    }
}
