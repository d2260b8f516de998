//! Root dispatcher: root level plus the shared destination set

use crate::{AtomicLevel, Destination, Error, Level, Logger, Record, Result};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Root of the logging pipeline.
///
/// Records below the root level are dropped; the rest are published to every
/// attached destination whose own level admits them. Cloning yields another
/// handle to the same state.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    level: AtomicLevel,
    sealed: AtomicBool,
    destinations: RwLock<Vec<Arc<dyn Destination>>>,
}

impl Dispatcher {
    /// Create an empty dispatcher at `Info`
    pub fn new() -> Self {
        Self::with_level(Level::Info)
    }

    /// Create an empty dispatcher at `level`
    pub fn with_level(level: Level) -> Self {
        Self {
            inner: Arc::new(Inner {
                level: AtomicLevel::new(level),
                sealed: AtomicBool::new(false),
                destinations: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The process-wide dispatcher.
    ///
    /// Intended for the outermost entry point of a program; library code
    /// should take a `&Dispatcher` instead.
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(Dispatcher::new)
    }

    /// A named logger publishing into this dispatcher
    pub fn logger(&self, name: impl Into<Cow<'static, str>>) -> Logger {
        Logger::new(name, self.clone())
    }

    /// Root level
    pub fn level(&self) -> Level {
        self.inner.level.load()
    }

    /// Replace the root level only
    pub fn set_level(&self, level: Level) -> Result<()> {
        self.check_control()?;
        self.inner.level.store(level);
        Ok(())
    }

    /// Replace the root level and the level of every attached destination
    pub fn set_level_all(&self, level: Level) -> Result<()> {
        self.check_control()?;
        self.inner.level.store(level);
        for destination in self.inner.destinations.read().iter() {
            destination.set_level(level);
        }
        Ok(())
    }

    /// Attach a destination
    pub fn add_destination(&self, destination: Arc<dyn Destination>) -> Result<()> {
        self.check_control()?;
        self.inner.destinations.write().push(destination);
        Ok(())
    }

    /// Detach every destination matching `predicate`, returning how many went
    pub fn remove_destinations<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&dyn Destination) -> bool,
    {
        self.check_control()?;
        let mut destinations = self.inner.destinations.write();
        let before = destinations.len();
        destinations.retain(|destination| !predicate(destination.as_ref()));
        Ok(before - destinations.len())
    }

    /// Swap in a whole destination set, e.g. a snapshot taken earlier with
    /// [`Dispatcher::destinations`]
    pub fn replace_destinations(&self, destinations: Vec<Arc<dyn Destination>>) -> Result<()> {
        self.check_control()?;
        *self.inner.destinations.write() = destinations;
        Ok(())
    }

    /// Snapshot of the attached destinations
    pub fn destinations(&self) -> Vec<Arc<dyn Destination>> {
        self.inner.destinations.read().clone()
    }

    /// Check a level against the root filter
    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Publish a record to every destination that accepts its level
    pub fn log(&self, record: Record) {
        if !self.is_enabled(record.level) {
            return;
        }

        // A destination may itself log (through a bridge) while publishing.
        let destinations = self.inner.destinations.read_recursive();
        for destination in destinations.iter() {
            if destination.is_enabled(record.level) {
                destination.publish(&record);
            }
        }
    }

    /// Flush every destination
    pub fn flush(&self) {
        for destination in self.inner.destinations.read_recursive().iter() {
            destination.flush();
        }
    }

    /// Freeze the configuration.
    ///
    /// Afterwards every method that changes levels or destinations fails with
    /// [`Error::PermissionDenied`]. Logging keeps working.
    pub fn seal(&self) {
        self.inner.sealed.store(true, Ordering::Release);
    }

    /// Whether [`Dispatcher::seal`] has been called
    pub fn is_sealed(&self) -> bool {
        self.inner.sealed.load(Ordering::Acquire)
    }

    /// Fail if the configuration may no longer change
    pub fn check_control(&self) -> Result<()> {
        if self.is_sealed() {
            return Err(Error::PermissionDenied("dispatcher configuration is sealed"));
        }
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("level", &self.level())
            .field("destinations", &self.inner.destinations.read().len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CaptureDestination;

    #[test]
    fn root_level_filters_before_destinations() {
        let dispatcher = Dispatcher::with_level(Level::Warn);
        let capture = CaptureDestination::new();
        dispatcher.add_destination(Arc::new(capture.clone())).unwrap();

        dispatcher.log(Record::new(Level::Stdout, "dropped"));
        dispatcher.log(Record::new(Level::Warn, "kept"));

        assert_eq!(capture.messages(), vec!["kept".to_string()]);
    }

    #[test]
    fn destination_level_filters_independently() {
        let dispatcher = Dispatcher::with_level(Level::Trace);
        let loose = CaptureDestination::new();
        let strict = CaptureDestination::new().with_level(Level::Error);
        dispatcher.add_destination(Arc::new(loose.clone())).unwrap();
        dispatcher.add_destination(Arc::new(strict.clone())).unwrap();

        dispatcher.log(Record::new(Level::Stderr, "stream text"));

        assert_eq!(loose.messages().len(), 1);
        assert!(strict.messages().is_empty());
    }

    #[test]
    fn set_level_all_updates_destinations() {
        let dispatcher = Dispatcher::new();
        let capture = CaptureDestination::new().with_level(Level::Error);
        dispatcher.add_destination(Arc::new(capture.clone())).unwrap();

        dispatcher.set_level_all(Level::Debug).unwrap();

        assert_eq!(dispatcher.level(), Level::Debug);
        assert_eq!(capture.level(), Level::Debug);
        dispatcher.log(Record::new(Level::Debug, "now visible"));
        assert_eq!(capture.messages(), vec!["now visible".to_string()]);
    }

    #[test]
    fn remove_destinations_by_predicate() {
        let dispatcher = Dispatcher::new();
        let console = CaptureDestination::new().as_console();
        let plain = CaptureDestination::new();
        dispatcher.add_destination(Arc::new(console.clone())).unwrap();
        dispatcher.add_destination(Arc::new(plain.clone())).unwrap();

        let removed = dispatcher
            .remove_destinations(|d| d.writes_to_console())
            .unwrap();

        assert_eq!(removed, 1);
        assert_eq!(dispatcher.destinations().len(), 1);
        dispatcher.log(Record::new(Level::Info, "after"));
        assert!(console.messages().is_empty());
        assert_eq!(plain.messages().len(), 1);
    }

    #[test]
    fn replace_destinations_restores_snapshot() {
        let dispatcher = Dispatcher::new();
        let first = CaptureDestination::new().as_console();
        let second = CaptureDestination::new();
        dispatcher.add_destination(Arc::new(first.clone())).unwrap();
        dispatcher.add_destination(Arc::new(second.clone())).unwrap();
        let snapshot = dispatcher.destinations();

        dispatcher.remove_destinations(|d| d.writes_to_console()).unwrap();
        dispatcher.replace_destinations(snapshot).unwrap();

        let restored = dispatcher.destinations();
        assert_eq!(restored.len(), 2);
        assert!(restored[0].writes_to_console());
        dispatcher.log(Record::new(Level::Warn, "both"));
        assert_eq!(first.messages(), vec!["both".to_string()]);
        assert_eq!(second.messages(), vec!["both".to_string()]);
    }

    #[test]
    fn sealed_dispatcher_rejects_changes() {
        let dispatcher = Dispatcher::new();
        dispatcher.seal();

        assert!(matches!(
            dispatcher.add_destination(Arc::new(CaptureDestination::new())),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            dispatcher.set_level_all(Level::Trace),
            Err(Error::PermissionDenied(_))
        ));
        assert!(dispatcher.destinations().is_empty());
        assert_eq!(dispatcher.level(), Level::Info);
    }

    #[test]
    fn named_logger_tags_records() {
        let dispatcher = Dispatcher::new();
        let capture = CaptureDestination::new();
        dispatcher.add_destination(Arc::new(capture.clone())).unwrap();

        dispatcher.logger("engine").warn("slow start");

        let records = capture.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].logger, "engine");
        assert_eq!(records[0].level, Level::Warn);
    }

    #[test]
    fn clones_share_state() {
        let dispatcher = Dispatcher::new();
        let other = dispatcher.clone();
        other.set_level(Level::Error).unwrap();
        assert_eq!(dispatcher.level(), Level::Error);
    }
}
