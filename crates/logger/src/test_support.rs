//! Test support utilities
//!
//! This module provides utilities for capturing records during tests.
//! It's only available when the `test-support` feature is enabled.

use crate::{AtomicLevel, Destination, Formatter, Level, PlainTextFormatter, Record};
use parking_lot::Mutex;
use std::sync::Arc;

/// A destination that keeps every record in memory
#[derive(Clone)]
pub struct CaptureDestination {
    records: Arc<Mutex<Vec<Record>>>,
    min_level: Arc<AtomicLevel>,
    console: bool,
}

impl CaptureDestination {
    /// Create a new capture destination accepting every level
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            min_level: Arc::new(AtomicLevel::new(Level::Trace)),
            console: false,
        }
    }

    /// Create with a specific level
    pub fn with_level(self, level: Level) -> Self {
        self.min_level.store(level);
        self
    }

    /// Pretend to write to the console, so redirection setup detaches it
    pub fn as_console(mut self) -> Self {
        self.console = true;
        self
    }

    /// Get all captured records
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Get the message of every captured record
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    /// Get all captured records rendered as plain text
    pub fn logs(&self) -> String {
        self.records
            .lock()
            .iter()
            .map(|record| PlainTextFormatter.format(record))
            .collect()
    }

    /// Clear captured records
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    /// Check if any captured message contains a specific string
    pub fn contains(&self, text: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|record| record.message.contains(text))
    }
}

impl Default for CaptureDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for CaptureDestination {
    fn publish(&self, record: &Record) {
        self.records.lock().push(record.clone());
    }

    fn flush(&self) {
        // No-op for in-memory destination
    }

    fn level(&self) -> Level {
        self.min_level.load()
    }

    fn set_level(&self, level: Level) {
        self.min_level.store(level);
    }

    fn writes_to_console(&self) -> bool {
        self.console
    }
}
