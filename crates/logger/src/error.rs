//! Error types for the dispatcher

use thiserror::Error;

/// Result type for dispatcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or using the dispatcher
#[derive(Debug, Error)]
pub enum Error {
    /// A severity rank did not match any canonical level
    #[error("unrecognized severity rank: {0}")]
    UnrecognizedSeverity(u16),

    /// A severity name did not match any level
    #[error("unknown level name: {0}")]
    UnknownLevelName(String),

    /// The dispatcher configuration has been sealed
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// Another `log` logger was installed first
    #[cfg(feature = "log-compat")]
    #[error("could not install log bridge: {0}")]
    SetLogger(#[from] log::SetLoggerError),

    /// Another global tracing subscriber was installed first
    #[cfg(feature = "tracing-compat")]
    #[error("could not install tracing bridge: {0}")]
    SetSubscriber(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
