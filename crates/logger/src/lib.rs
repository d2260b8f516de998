//! Leveled log dispatcher with pluggable destinations
//!
//! This crate is the substrate the standard-stream capture and file rotation
//! crates configure:
//! - [`Level`] with two extra levels for captured stdout and stderr text
//! - [`Dispatcher`] holding the root level and the shared destination set
//! - [`Destination`] implemented by the console, files, and test buffers
//! - bridges from the `log` and `tracing` facades

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod console;
mod destination;
mod dispatcher;
mod error;
mod format;
mod level;
mod logger;
mod record;

pub mod compat;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use console::{ConsoleDestination, ConsoleStream};
pub use destination::Destination;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use format::{Formatter, PlainTextFormatter};
pub use level::{AtomicLevel, Level, StreamLevel};
pub use logger::Logger;
pub use record::Record;
