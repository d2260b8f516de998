//! Log record type

use crate::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single log event as it travels through the dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Log level
    pub level: Level,
    /// The log message
    pub message: String,
    /// Name of the logger that produced the record
    pub logger: Cow<'static, str>,
    /// When the record was created
    pub timestamp: DateTime<Utc>,
    /// File location, if the caller is known
    pub file: Option<Cow<'static, str>>,
    /// Line number, if the caller is known
    pub line: Option<u32>,
}

impl Record {
    /// Create a new record attributed to the root logger
    #[inline]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            logger: Cow::Borrowed(""),
            timestamp: Utc::now(),
            file: None,
            line: None,
        }
    }

    /// Builder-style method for setting the logger name
    #[inline]
    pub fn with_logger(mut self, logger: impl Into<Cow<'static, str>>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Builder-style method for setting location
    #[inline]
    pub fn with_location(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    /// Builder-style method for overriding the timestamp
    #[inline]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// `file:line` when both are known
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) if !file.is_empty() => Some(format!("{file}:{line}")),
            _ => None,
        }
    }
}
