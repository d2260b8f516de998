//! Size- and count-bounded rotating log files
//!
//! This crate provides a file destination for the dispatcher that supports:
//! - A fixed `{directory}/{processId}.log.{generation}` naming pattern
//! - Rotation once a generation reaches an approximate byte limit
//! - A bounded number of generations, oldest overwritten first
//! - Append mode for resuming the current generation across restarts

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod rotating;

pub use config::{RotatingFileConfig, RotatingFileConfigBuilder};
pub use error::{Error, Result};
pub use rotating::{RotatingFileSink, create_rotating_file_sink};
