//! Compatibility bridges for other logging crates

#[cfg(feature = "log-compat")]
pub mod log_bridge;

#[cfg(feature = "tracing-compat")]
pub mod tracing_bridge;

#[cfg(all(feature = "log-compat", feature = "tracing-compat"))]
use crate::{Dispatcher, Result};

/// Route both `log` and `tracing` events into `dispatcher`
///
/// # Errors
///
/// Fails if either facade already has a global logger or subscriber.
#[cfg(all(feature = "log-compat", feature = "tracing-compat"))]
pub fn init_with_bridges(dispatcher: &Dispatcher) -> Result<()> {
    log_bridge::init_log_bridge(dispatcher)?;
    tracing_bridge::init_tracing_bridge(dispatcher)?;
    Ok(())
}
