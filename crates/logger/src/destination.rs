//! Destination trait implemented by everything the dispatcher fans out to

use crate::{Level, Record};

/// A place records are published to: the console, a file, a test buffer.
///
/// Each destination carries its own minimum level, checked after the
/// dispatcher's root level.
pub trait Destination: Send + Sync + 'static {
    /// Publish a record that already passed both level checks
    fn publish(&self, record: &Record);

    /// Flush any buffered output
    fn flush(&self);

    /// This destination's minimum level
    fn level(&self) -> Level;

    /// Replace this destination's minimum level
    fn set_level(&self, level: Level);

    /// Check if a level is enabled (for fast filtering)
    #[inline]
    fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Whether this destination writes to the process's standard streams.
    ///
    /// Such destinations must be detached before the standard streams are
    /// redirected into the dispatcher, otherwise every record they print is
    /// captured and dispatched again.
    fn writes_to_console(&self) -> bool {
        false
    }
}
