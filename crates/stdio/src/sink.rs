//! Byte buffer that turns flushed console output into log records

use parking_lot::Mutex;
use std::io;
use streamlog_logger::{Dispatcher, Logger, StreamLevel};

/// Line separator of the platform the process runs on
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Line separator of the platform the process runs on
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Collects bytes written to a redirected stream and publishes them as one
/// record per flush.
///
/// Writing never logs. Flushing takes the buffered text, clears the buffer,
/// and emits a record at the sink's [`StreamLevel`] through a logger named
/// after the stream, unless the text is empty or just a line separator.
pub struct RedirectSink {
    buffer: Mutex<Vec<u8>>,
    logger: Logger,
    level: StreamLevel,
    line_separator: &'static str,
}

impl RedirectSink {
    /// Create a sink publishing at `level` through `logger`
    pub fn new(logger: Logger, level: StreamLevel) -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            logger,
            level,
            line_separator: LINE_SEPARATOR,
        }
    }

    /// Sink for captured standard output, logging as `"stdout"`
    pub fn stdout(dispatcher: &Dispatcher) -> Self {
        Self::for_stream(dispatcher, StreamLevel::Stdout)
    }

    /// Sink for captured standard error, logging as `"stderr"`
    pub fn stderr(dispatcher: &Dispatcher) -> Self {
        Self::for_stream(dispatcher, StreamLevel::Stderr)
    }

    fn for_stream(dispatcher: &Dispatcher, level: StreamLevel) -> Self {
        Self::new(dispatcher.logger(level.logger_name()), level)
    }

    /// Level every record from this sink carries
    pub fn level(&self) -> StreamLevel {
        self.level
    }

    /// Name of the logger records are published through
    pub fn logger_name(&self) -> &str {
        self.logger.name()
    }

    /// Append bytes to the buffer
    pub fn write(&self, bytes: &[u8]) {
        self.buffer.lock().extend_from_slice(bytes);
    }

    /// Publish the buffered text as one record and clear the buffer
    pub fn flush(&self) {
        let mut buffer = self.buffer.lock();
        self.emit(&mut buffer);
    }

    /// Append and publish under a single lock acquisition, so nothing another
    /// writer buffers can end up in the same record
    pub fn write_and_flush(&self, bytes: &[u8]) {
        let mut buffer = self.buffer.lock();
        buffer.extend_from_slice(bytes);
        self.emit(&mut buffer);
    }

    /// Number of bytes waiting for the next flush
    pub fn pending(&self) -> usize {
        self.buffer.lock().len()
    }

    fn emit(&self, buffer: &mut Vec<u8>) {
        let bytes = std::mem::take(buffer);
        if bytes.is_empty() {
            return;
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        if text == self.line_separator {
            return;
        }

        self.logger.log(self.level.level(), text);
    }
}

impl std::fmt::Debug for RedirectSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectSink")
            .field("logger", &self.logger.name())
            .field("level", &self.level)
            .field("pending", &self.pending())
            .finish()
    }
}

impl io::Write for &RedirectSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RedirectSink::write(*self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        RedirectSink::flush(*self);
        Ok(())
    }
}

impl io::Write for RedirectSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut &*self)
    }
}
