//! Capture of standard output and standard error into a log dispatcher
//!
//! Text a process prints is turned into records at [`Level::Stdout`] or
//! [`Level::Stderr`] and fanned out with everything else the dispatcher
//! handles, typically into a rotating file sink.
//!
//! - [`RedirectSink`] buffers bytes and emits one record per flush
//! - [`AutoFlushWriter`] flushes it at every completed line
//! - [`initialize`] sets levels, detaches console destinations, and installs
//!   the writers through [`StreamTargets`]
//! - [`ProcessStreams`] points file descriptors 1 and 2 at the writers
//! - [`LoggingConfig`] and [`init_from_config`] drive all of it from TOML
//!
//! [`Level::Stdout`]: streamlog_logger::Level::Stdout
//! [`Level::Stderr`]: streamlog_logger::Level::Stderr

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod auto_flush;
mod config;
mod error;
mod init;
mod sink;
mod streams;

pub use auto_flush::AutoFlushWriter;
pub use config::{LoggingConfig, init_from_config};
pub use error::{Error, Result};
pub use init::{attach_destination, initialize};
pub use sink::{LINE_SEPARATOR, RedirectSink};
pub use streams::{HeldStreams, ProcessStreams, StandardStream, StreamTargets};
