//! Record formatting

use crate::Record;

/// Turns a record into the text a destination writes
pub trait Formatter: Send + Sync + 'static {
    /// Render one record, including its trailing newline
    fn format(&self, record: &Record) -> String;
}

/// Human-readable single-line format:
/// `2024-05-01T12:00:00.000Z STDOUT [stdout] message`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextFormatter;

impl Formatter for PlainTextFormatter {
    fn format(&self, record: &Record) -> String {
        let location = record
            .location()
            .map(|location| format!(" {location}"))
            .unwrap_or_default();

        // Captured console text usually carries its own line terminator.
        let message = record.message.trim_end_matches(['\r', '\n']);

        format!(
            "{} {} [{}]{} {}\n",
            record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            record.level,
            record.logger,
            location,
            message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use chrono::{TimeZone, Utc};

    fn at_noon(record: Record) -> Record {
        record.with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn formats_stream_record_without_location() {
        let record = at_noon(Record::new(Level::Stdout, "hello\n").with_logger("stdout"));
        assert_eq!(
            PlainTextFormatter.format(&record),
            "2024-05-01T12:00:00.000Z STDOUT [stdout] hello\n"
        );
    }

    #[test]
    fn includes_location_when_known() {
        let record = at_noon(
            Record::new(Level::Warn, "disk almost full")
                .with_logger("storage")
                .with_location("src/disk.rs", 42),
        );
        assert_eq!(
            PlainTextFormatter.format(&record),
            "2024-05-01T12:00:00.000Z WARN [storage] src/disk.rs:42 disk almost full\n"
        );
    }

    #[test]
    fn keeps_embedded_newlines() {
        let record = at_noon(Record::new(Level::Stderr, "first\nsecond\r\n").with_logger("stderr"));
        assert!(PlainTextFormatter.format(&record).ends_with("first\nsecond\n"));
    }
}
