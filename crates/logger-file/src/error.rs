//! Error types for the rotating file sink

use std::io;
use std::path::PathBuf;

/// Result type for file sink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while creating or rotating log files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed rotation parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to create log directory
    #[error("Failed to create log directory at {path}: {source}")]
    CreateDirectory {
        /// The path that failed to be created
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to open or create a log file
    #[error("Failed to open log file {path}: {source}")]
    Open {
        /// The file that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
