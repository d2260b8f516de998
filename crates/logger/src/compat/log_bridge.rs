//! Bridge from the `log` crate to the dispatcher

use crate::{Dispatcher, Level, Record, Result};
use log::{Log, Metadata, Record as LogRecord};

/// Wrapper to implement the log crate's Log trait
pub struct LogBridge {
    dispatcher: Dispatcher,
}

impl LogBridge {
    /// Create a new log bridge
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.dispatcher.is_enabled(map_level(metadata.level()))
    }

    fn log(&self, record: &LogRecord) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut bridged = Record::new(map_level(record.level()), record.args().to_string())
            .with_logger(record.target().to_owned());

        if let (Some(file), Some(line)) = (record.file(), record.line()) {
            bridged = bridged.with_location(file.to_owned(), line);
        }

        self.dispatcher.log(bridged);
    }

    fn flush(&self) {
        self.dispatcher.flush();
    }
}

/// Map log levels to our levels
fn map_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Trace,
    }
}

/// Initialize the log crate to publish into `dispatcher`
///
/// This will capture all logs from crates using the `log` crate macros.
/// Filtering happens in the dispatcher, so the facade's own maximum level is
/// opened all the way.
///
/// # Errors
///
/// Fails if another `log` logger is already installed.
///
/// # Example
/// ```no_run
/// use streamlog_logger::{Dispatcher, compat::log_bridge::init_log_bridge};
///
/// init_log_bridge(Dispatcher::global()).expect("Failed to set log bridge");
/// ```
pub fn init_log_bridge(dispatcher: &Dispatcher) -> Result<()> {
    // log::set_logger requires 'static
    let bridge = Box::leak(Box::new(LogBridge::new(dispatcher.clone())));

    log::set_logger(bridge)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
