//! Configuration for the rotating file sink

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default per-file size ceiling (100 MiB)
const DEFAULT_BYTE_LIMIT: i64 = 100 * 1024 * 1024;

/// Default number of generations kept
const DEFAULT_FILE_COUNT: i32 = 5;

/// Where and how the rotating file sink writes.
///
/// Signed integers keep malformed values representable so they can be
/// rejected by [`RotatingFileConfig::validate`] rather than by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatingFileConfig {
    /// Directory the log files live in
    pub directory: PathBuf,
    /// Identifier used as the file name stem
    pub process_id: String,
    /// Continue the current generation instead of rotating on open
    #[serde(default)]
    pub append: bool,
    /// Approximate size ceiling per file in bytes; `0` disables rotation
    #[serde(default = "default_byte_limit")]
    pub byte_limit: i64,
    /// Number of generations cycled through
    #[serde(default = "default_file_count")]
    pub file_count: i32,
}

fn default_byte_limit() -> i64 {
    DEFAULT_BYTE_LIMIT
}

fn default_file_count() -> i32 {
    DEFAULT_FILE_COUNT
}

impl RotatingFileConfig {
    /// Start building a config
    pub fn builder() -> RotatingFileConfigBuilder {
        RotatingFileConfigBuilder::default()
    }

    /// Check the rotation parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `byte_limit < 0`,
    /// `file_count < 1`, or the process id is empty.
    pub fn validate(&self) -> Result<()> {
        if self.byte_limit < 0 {
            return Err(Error::InvalidArgument(format!(
                "byte limit must not be negative, got {}",
                self.byte_limit
            )));
        }
        if self.file_count < 1 {
            return Err(Error::InvalidArgument(format!(
                "file count must be at least 1, got {}",
                self.file_count
            )));
        }
        if self.process_id.is_empty() {
            return Err(Error::InvalidArgument(
                "process id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the given generation
    pub fn path_for(&self, generation: u32) -> PathBuf {
        self.directory
            .join(format!("{}.log.{generation}", self.process_id))
    }

    /// Size ceiling, `None` when rotation is disabled
    pub(crate) fn limit(&self) -> Option<u64> {
        u64::try_from(self.byte_limit).ok().filter(|limit| *limit > 0)
    }

    /// Generation count as an unsigned number
    pub(crate) fn generations(&self) -> u32 {
        u32::try_from(self.file_count).unwrap_or(1).max(1)
    }
}

/// Builder for [`RotatingFileConfig`]
#[derive(Debug, Clone)]
pub struct RotatingFileConfigBuilder {
    directory: PathBuf,
    process_id: String,
    append: bool,
    byte_limit: i64,
    file_count: i32,
}

impl Default for RotatingFileConfigBuilder {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            process_id: String::new(),
            append: false,
            byte_limit: DEFAULT_BYTE_LIMIT,
            file_count: DEFAULT_FILE_COUNT,
        }
    }
}

impl RotatingFileConfigBuilder {
    /// Set the log directory
    pub fn directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Set the process identifier used as the file stem
    pub fn process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = process_id.into();
        self
    }

    /// Set append mode
    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Set the per-file byte limit
    pub fn byte_limit(mut self, byte_limit: i64) -> Self {
        self.byte_limit = byte_limit;
        self
    }

    /// Set the number of generations
    pub fn file_count(mut self, file_count: i32) -> Self {
        self.file_count = file_count;
        self
    }

    /// Build and validate the config
    ///
    /// # Errors
    ///
    /// See [`RotatingFileConfig::validate`].
    pub fn build(self) -> Result<RotatingFileConfig> {
        let config = RotatingFileConfig {
            directory: self.directory,
            process_id: self.process_id,
            append: self.append,
            byte_limit: self.byte_limit,
            file_count: self.file_count,
        };
        config.validate()?;
        Ok(config)
    }
}
