//! One-time wiring of levels, console detachment, and stream capture

use crate::{AutoFlushWriter, RedirectSink, Result, StreamTargets};
use std::sync::Arc;
use streamlog_logger::{Destination, Dispatcher, Level};
use tracing::{debug, info, warn};

/// Configure `dispatcher` and optionally capture the standard streams.
///
/// `level` becomes the root level and the level of every attached
/// destination. With `redirect_streams`, console destinations are detached
/// first (otherwise everything they print would be captured and dispatched
/// again), then a `"stdout"` sink at [`Level::Stdout`] and a `"stderr"` sink
/// at [`Level::Stderr`] are installed into `targets`.
///
/// Calling this again yields the same end state.
///
/// # Errors
///
/// - [`crate::Error::PermissionDenied`] if the dispatcher has been sealed
/// - [`crate::Error::Io`] if the streams could not be acquired or swapped;
///   the original streams, destinations and levels are left as they were
///
/// # Example
/// ```no_run
/// use streamlog_logger::{Dispatcher, Level};
/// use streamlog_stdio::{ProcessStreams, initialize};
///
/// let mut streams = ProcessStreams::new();
/// initialize(Dispatcher::global(), Level::Info, true, &mut streams)
///     .expect("Failed to redirect standard streams");
/// println!("this line is now a STDOUT record");
/// ```
pub fn initialize(
    dispatcher: &Dispatcher,
    level: Level,
    redirect_streams: bool,
    targets: &mut dyn StreamTargets,
) -> Result<()> {
    let previous = Snapshot::take(dispatcher);
    dispatcher.set_level_all(level)?;

    if !redirect_streams {
        debug!("log level set to {level}, standard streams left alone");
        return Ok(());
    }

    let removed = dispatcher.remove_destinations(|d| d.writes_to_console())?;
    if removed > 0 {
        debug!("detached {removed} console destination(s) before redirecting");
    }

    let stdout = AutoFlushWriter::new(Arc::new(RedirectSink::stdout(dispatcher)));
    let stderr = AutoFlushWriter::new(Arc::new(RedirectSink::stderr(dispatcher)));
    if let Err(e) = targets.replace(stdout, stderr) {
        previous.restore(dispatcher);
        return Err(e);
    }

    info!("standard streams redirected into the log dispatcher at level {level}");
    Ok(())
}

/// Add a destination to `dispatcher`
///
/// # Errors
///
/// Returns [`crate::Error::PermissionDenied`] if the dispatcher has been sealed.
pub fn attach_destination(dispatcher: &Dispatcher, destination: Arc<dyn Destination>) -> Result<()> {
    dispatcher.add_destination(destination)?;
    Ok(())
}

/// Dispatcher state put back when the stream swap fails
struct Snapshot {
    root: Level,
    destinations: Vec<(Arc<dyn Destination>, Level)>,
}

impl Snapshot {
    fn take(dispatcher: &Dispatcher) -> Self {
        Self {
            root: dispatcher.level(),
            destinations: dispatcher
                .destinations()
                .into_iter()
                .map(|destination| {
                    let level = destination.level();
                    (destination, level)
                })
                .collect(),
        }
    }

    fn restore(self, dispatcher: &Dispatcher) {
        let mut destinations = Vec::with_capacity(self.destinations.len());
        for (destination, level) in self.destinations {
            destination.set_level(level);
            destinations.push(destination);
        }

        let restored = dispatcher
            .replace_destinations(destinations)
            .and_then(|()| dispatcher.set_level(self.root));
        if let Err(e) = restored {
            warn!("could not roll back dispatcher after failed redirect: {e}");
        }
    }
}
