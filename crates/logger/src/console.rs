//! Console destination writing to stdout or stderr

use crate::{AtomicLevel, Destination, Formatter, Level, PlainTextFormatter, Record};
use std::io::Write;

/// Which standard stream a [`ConsoleDestination`] prints to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Destination that prints formatted records to the console.
///
/// Reports [`Destination::writes_to_console`] so it can be detached before
/// the standard streams are redirected into the dispatcher.
pub struct ConsoleDestination {
    stream: ConsoleStream,
    min_level: AtomicLevel,
    formatter: Box<dyn Formatter>,
}

impl ConsoleDestination {
    /// Create a console destination on stderr
    pub fn new() -> Self {
        Self::on(ConsoleStream::Stderr)
    }

    /// Create a console destination on the given stream
    pub fn on(stream: ConsoleStream) -> Self {
        Self {
            stream,
            min_level: AtomicLevel::new(Level::Info),
            formatter: Box::new(PlainTextFormatter),
        }
    }

    /// Create with a specific minimum level
    pub fn with_level(self, level: Level) -> Self {
        self.min_level.store(level);
        self
    }

    /// Create with a specific formatter
    pub fn with_formatter(mut self, formatter: impl Formatter) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// The stream this destination prints to
    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Default for ConsoleDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for ConsoleDestination {
    fn publish(&self, record: &Record) {
        let line = self.formatter.format(record);

        // The std handles serialize writers, so lines never interleave.
        match self.stream {
            ConsoleStream::Stdout => {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(line.as_bytes());
                let _ = stdout.flush();
            }
            ConsoleStream::Stderr => {
                let _ = std::io::stderr().lock().write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        let _ = match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush(),
            ConsoleStream::Stderr => std::io::stderr().flush(),
        };
    }

    fn level(&self) -> Level {
        self.min_level.load()
    }

    fn set_level(&self, level: Level) {
        self.min_level.store(level);
    }

    fn writes_to_console(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for ConsoleDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleDestination")
            .field("stream", &self.stream)
            .field("min_level", &self.level())
            .finish()
    }
}
