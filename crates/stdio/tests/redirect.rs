//! Initialization and capture through injected stream targets

use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use streamlog_logger::test_support::CaptureDestination;
use streamlog_logger::{Destination, Dispatcher, Level, StreamLevel};
use streamlog_stdio::{
    AutoFlushWriter, Error, HeldStreams, LINE_SEPARATOR, RedirectSink, StreamTargets,
    attach_destination, initialize,
};

fn dispatcher_with_capture() -> (Dispatcher, CaptureDestination) {
    let dispatcher = Dispatcher::new();
    let capture = CaptureDestination::new();
    dispatcher.add_destination(Arc::new(capture.clone())).unwrap();
    (dispatcher, capture)
}

#[test]
fn flushed_text_becomes_one_record_at_sink_level() {
    let (dispatcher, capture) = dispatcher_with_capture();

    for text in ["x", "two words", "line\n", "a\nb\nc\n", "ünïcødé"] {
        capture.clear();
        let sink = RedirectSink::stderr(&dispatcher);
        sink.write(text.as_bytes());
        sink.flush();

        let records = capture.records();
        assert_eq!(records.len(), 1, "text {text:?}");
        assert_eq!(records[0].message, text);
        assert_eq!(records[0].level, Level::Stderr);
    }
}

#[test]
fn empty_and_separator_flushes_emit_nothing() {
    let (dispatcher, capture) = dispatcher_with_capture();
    let sink = RedirectSink::stdout(&dispatcher);

    sink.flush();
    sink.write(b"");
    sink.flush();
    sink.write(LINE_SEPARATOR.as_bytes());
    sink.flush();

    assert!(capture.records().is_empty());
}

#[test]
fn stream_levels_canonicalize_by_rank() {
    assert_eq!(StreamLevel::from_rank(853).unwrap(), StreamLevel::Stdout);
    assert_eq!(StreamLevel::from_rank(854).unwrap(), StreamLevel::Stderr);
    assert_eq!(
        StreamLevel::from_rank(853).unwrap(),
        StreamLevel::from_rank(853).unwrap()
    );
    for rank in [0, 800, 852, 855, 900] {
        assert!(matches!(
            StreamLevel::from_rank(rank),
            Err(streamlog_logger::Error::UnrecognizedSeverity(r)) if r == rank
        ));
    }
}

#[test]
fn initialize_detaches_console_destinations() {
    let (dispatcher, capture) = dispatcher_with_capture();
    let console = CaptureDestination::new().as_console();
    dispatcher.add_destination(Arc::new(console.clone())).unwrap();

    let mut targets = HeldStreams::new();
    initialize(&dispatcher, Level::Info, true, &mut targets).unwrap();

    assert!(
        dispatcher
            .destinations()
            .iter()
            .all(|d| !d.writes_to_console())
    );
    assert_eq!(dispatcher.destinations().len(), 1);

    writeln!(targets.stdout().unwrap(), "after redirect").unwrap();
    assert!(console.records().is_empty());
    assert!(capture.contains("after redirect"));
}

#[test]
fn initialize_without_redirect_keeps_console() {
    let (dispatcher, _capture) = dispatcher_with_capture();
    dispatcher
        .add_destination(Arc::new(CaptureDestination::new().as_console()))
        .unwrap();

    let mut targets = HeldStreams::new();
    initialize(&dispatcher, Level::Warn, false, &mut targets).unwrap();

    assert_eq!(dispatcher.level(), Level::Warn);
    assert!(dispatcher.destinations().iter().all(|d| d.level() == Level::Warn));
    assert_eq!(dispatcher.destinations().len(), 2);
    assert!(targets.stdout().is_none());
}

#[test]
fn redirected_streams_are_tagged_by_origin() {
    let (dispatcher, capture) = dispatcher_with_capture();
    let mut targets = HeldStreams::new();
    initialize(&dispatcher, Level::Info, true, &mut targets).unwrap();

    writeln!(targets.stdout().unwrap(), "to stdout").unwrap();
    writeln!(targets.stderr().unwrap(), "to stderr").unwrap();

    let records = capture.records();
    assert_eq!(records.len(), 2);
    assert_eq!(
        (records[0].level, &*records[0].logger, records[0].message.as_str()),
        (Level::Stdout, "stdout", "to stdout\n")
    );
    assert_eq!(
        (records[1].level, &*records[1].logger, records[1].message.as_str()),
        (Level::Stderr, "stderr", "to stderr\n")
    );
}

#[test]
fn warn_level_drops_captured_text() {
    let (dispatcher, capture) = dispatcher_with_capture();
    let mut targets = HeldStreams::new();
    initialize(&dispatcher, Level::Warn, true, &mut targets).unwrap();

    writeln!(targets.stderr().unwrap(), "suppressed").unwrap();

    assert!(capture.records().is_empty());
}

#[test]
fn repeated_initialize_reaches_same_state() {
    let (dispatcher, capture) = dispatcher_with_capture();
    let mut targets = HeldStreams::new();

    initialize(&dispatcher, Level::Debug, true, &mut targets).unwrap();
    initialize(&dispatcher, Level::Debug, true, &mut targets).unwrap();

    assert_eq!(dispatcher.destinations().len(), 1);
    writeln!(targets.stdout().unwrap(), "once").unwrap();
    assert_eq!(capture.messages(), vec!["once\n".to_string()]);
}

/// Targets whose streams can never be acquired
struct Unavailable;

impl StreamTargets for Unavailable {
    fn replace(&mut self, _stdout: AutoFlushWriter, _stderr: AutoFlushWriter) -> Result<(), Error> {
        Err(Error::Io(
            "acquiring standard streams",
            std::io::Error::other("unavailable"),
        ))
    }
}

#[test]
fn failed_swap_leaves_dispatcher_untouched() {
    let dispatcher = Dispatcher::with_level(Level::Warn);
    let console = CaptureDestination::new().as_console().with_level(Level::Error);
    let plain = CaptureDestination::new().with_level(Level::Info);
    dispatcher.add_destination(Arc::new(console.clone())).unwrap();
    dispatcher.add_destination(Arc::new(plain.clone())).unwrap();

    let result = initialize(&dispatcher, Level::Debug, true, &mut Unavailable);
    assert!(matches!(result, Err(Error::Io(..))));

    let destinations = dispatcher.destinations();
    assert_eq!(destinations.len(), 2);
    assert!(destinations[0].writes_to_console());
    assert_eq!(dispatcher.level(), Level::Warn);
    assert_eq!(console.level(), Level::Error);
    assert_eq!(plain.level(), Level::Info);

    dispatcher.logger("app").error("still on the console");
    assert_eq!(console.messages(), vec!["still on the console".to_string()]);
}

#[test]
fn sealed_dispatcher_refuses_configuration() {
    let (dispatcher, _capture) = dispatcher_with_capture();
    dispatcher.seal();

    let mut targets = HeldStreams::new();
    assert!(matches!(
        initialize(&dispatcher, Level::Debug, true, &mut targets),
        Err(Error::PermissionDenied(_))
    ));
    assert!(targets.stdout().is_none());

    assert!(matches!(
        attach_destination(&dispatcher, Arc::new(CaptureDestination::new())),
        Err(Error::PermissionDenied(_))
    ));
    assert_eq!(dispatcher.destinations().len(), 1);
    assert_eq!(dispatcher.level(), Level::Info);
}

#[test]
fn concurrent_writers_never_share_a_record() {
    const WRITERS: usize = 50;
    const LINES: usize = 100;

    let (dispatcher, capture) = dispatcher_with_capture();
    let writer = AutoFlushWriter::new(Arc::new(RedirectSink::stdout(&dispatcher)));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let mut writer = writer.fork();
            thread::spawn(move || {
                for l in 0..LINES {
                    // Split lines across writes so partial text is pending
                    // while other threads flush.
                    write!(writer, "w{w:02}-").unwrap();
                    writeln!(writer, "l{l:03}").unwrap();
                    if l % 7 == 0 {
                        writer.flush().unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    drop(writer);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for record in capture.records() {
        let lines: Vec<&str> = record.message.lines().collect();
        let owner = &lines[0][..3];
        for line in &lines {
            assert!(
                line.starts_with(owner),
                "record mixes writers: {:?}",
                record.message
            );
            *seen.entry((*line).to_string()).or_default() += 1;
        }
    }

    assert_eq!(seen.len(), WRITERS * LINES);
    assert!(seen.values().all(|count| *count == 1));
}
