//! Severity levels, including the two levels used for captured standard streams

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity, ordered from least to most severe.
///
/// `Stdout` and `Stderr` sit strictly between `Info` and `Warn`, so a filter
/// at `Info` lets captured console text through while a filter at `Warn`
/// drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Very fine-grained diagnostics
    Trace,
    /// Debugging detail
    Debug,
    /// Normal operational messages
    Info,
    /// Text captured from standard output
    Stdout,
    /// Text captured from standard error
    Stderr,
    /// Potentially harmful situations
    Warn,
    /// Failures
    Error,
}

impl Level {
    /// Every level, in ascending order
    pub const ALL: [Level; 7] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Stdout,
        Level::Stderr,
        Level::Warn,
        Level::Error,
    ];

    /// Numeric rank used for comparison and serialization
    #[inline]
    pub const fn rank(self) -> u16 {
        match self {
            Level::Trace => 300,
            Level::Debug => 500,
            Level::Info => 800,
            Level::Stdout => StreamLevel::STDOUT_RANK,
            Level::Stderr => StreamLevel::STDERR_RANK,
            Level::Warn => 900,
            Level::Error => 1000,
        }
    }

    /// Resolve a rank back to its canonical level
    pub fn from_rank(rank: u16) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.rank() == rank)
            .ok_or(Error::UnrecognizedSeverity(rank))
    }

    /// Upper-case display name
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Stdout => "STDOUT",
            Level::Stderr => "STDERR",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Whether this level tags captured stream text
    pub const fn is_stream(self) -> bool {
        matches!(self, Level::Stdout | Level::Stderr)
    }

    const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "stdout" => Ok(Level::Stdout),
            "stderr" => Ok(Level::Stderr),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(Error::UnknownLevelName(s.to_string())),
        }
    }
}

/// The two levels that tag text captured from the standard streams.
///
/// Serialized as its numeric rank. Deserializing goes through
/// [`StreamLevel::from_rank`], so a rank that is not one of the two known
/// values is rejected instead of producing a third stream level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum StreamLevel {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

impl StreamLevel {
    /// Rank of [`StreamLevel::Stdout`]: `Level::Info.rank() + 53`
    pub const STDOUT_RANK: u16 = 853;
    /// Rank of [`StreamLevel::Stderr`]: `Level::Info.rank() + 54`
    pub const STDERR_RANK: u16 = 854;

    /// Numeric rank
    pub const fn rank(self) -> u16 {
        match self {
            StreamLevel::Stdout => Self::STDOUT_RANK,
            StreamLevel::Stderr => Self::STDERR_RANK,
        }
    }

    /// Resolve a rank to the canonical stream level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedSeverity`] for any rank other than
    /// [`Self::STDOUT_RANK`] or [`Self::STDERR_RANK`].
    pub fn from_rank(rank: u16) -> Result<Self> {
        match rank {
            Self::STDOUT_RANK => Ok(StreamLevel::Stdout),
            Self::STDERR_RANK => Ok(StreamLevel::Stderr),
            other => Err(Error::UnrecognizedSeverity(other)),
        }
    }

    /// The general level this stream level corresponds to
    pub const fn level(self) -> Level {
        match self {
            StreamLevel::Stdout => Level::Stdout,
            StreamLevel::Stderr => Level::Stderr,
        }
    }

    /// Name of the logger that captured text is attributed to
    pub const fn logger_name(self) -> &'static str {
        match self {
            StreamLevel::Stdout => "stdout",
            StreamLevel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.level().fmt(f)
    }
}

impl From<StreamLevel> for Level {
    fn from(level: StreamLevel) -> Self {
        level.level()
    }
}

impl From<StreamLevel> for u16 {
    fn from(level: StreamLevel) -> Self {
        level.rank()
    }
}

impl TryFrom<u16> for StreamLevel {
    type Error = Error;

    fn try_from(rank: u16) -> Result<Self> {
        Self::from_rank(rank)
    }
}

impl TryFrom<Level> for StreamLevel {
    type Error = Error;

    fn try_from(level: Level) -> Result<Self> {
        Self::from_rank(level.rank())
    }
}

/// A level that can be read and replaced concurrently
#[derive(Debug)]
pub struct AtomicLevel(AtomicU8);

impl AtomicLevel {
    /// Create holding `level`
    pub const fn new(level: Level) -> Self {
        Self(AtomicU8::new(level.index()))
    }

    /// Current level
    #[inline]
    pub fn load(&self) -> Level {
        Level::ALL[usize::from(self.0.load(Ordering::Relaxed))]
    }

    /// Replace the level
    #[inline]
    pub fn store(&self, level: Level) {
        self.0.store(level.index(), Ordering::Relaxed);
    }
}
