//! Error types for stream redirection and initialization

use thiserror::Error;

/// Result type for stream redirection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while wiring the standard streams into a dispatcher
#[derive(Debug, Error)]
pub enum Error {
    /// A standard stream could not be acquired, swapped, or restored
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),

    /// The dispatcher configuration may no longer change
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// Any other dispatcher failure
    #[error(transparent)]
    Logger(streamlog_logger::Error),

    /// The rotating file sink could not be created
    #[error(transparent)]
    File(#[from] streamlog_logger_file::Error),

    /// The logging config could not be parsed
    #[error("invalid logging config: {0}")]
    Config(#[from] toml::de::Error),
}

impl From<streamlog_logger::Error> for Error {
    fn from(error: streamlog_logger::Error) -> Self {
        match error {
            streamlog_logger::Error::PermissionDenied(reason) => Self::PermissionDenied(reason),
            other => Self::Logger(other),
        }
    }
}
