//! Driving initialization from a TOML config

use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use streamlog_logger::test_support::CaptureDestination;
use streamlog_logger::{Dispatcher, Level};
use streamlog_stdio::{Error, HeldStreams, LoggingConfig, init_from_config};
use tempfile::TempDir;

#[test]
fn parses_nested_file_config() {
    let config = LoggingConfig::from_toml_str(
        r#"
        level = "debug"
        redirect_std_streams = true

        [file]
        directory = "/tmp/logs"
        process_id = "4242"
        byte_limit = 2048
        file_count = 3
        "#,
    )
    .unwrap();

    assert_eq!(config.level, Level::Debug);
    assert!(config.redirect_std_streams);
    let file = config.file.unwrap();
    assert_eq!(file.process_id, "4242");
    assert_eq!(file.byte_limit, 2048);
    assert_eq!(file.file_count, 3);
    assert!(!file.append);
}

#[test]
fn loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logging.toml");
    fs::write(&path, "level = \"error\"\n").unwrap();

    let config = LoggingConfig::from_file(&path).unwrap();
    assert_eq!(config.level, Level::Error);

    assert!(matches!(
        LoggingConfig::from_file(dir.path().join("missing.toml")),
        Err(Error::Io(..))
    ));
}

#[test]
fn captured_output_reaches_rotating_file() {
    let dir = TempDir::new().unwrap();
    let config = LoggingConfig::from_toml_str(&format!(
        r#"
        level = "info"
        redirect_std_streams = true

        [file]
        directory = {:?}
        process_id = "svc"
        byte_limit = 0
        file_count = 1
        "#,
        dir.path().display().to_string()
    ))
    .unwrap();

    let dispatcher = Dispatcher::new();
    let console = CaptureDestination::new().as_console();
    dispatcher.add_destination(Arc::new(console.clone())).unwrap();

    let mut targets = HeldStreams::new();
    let sink = init_from_config(&dispatcher, &config, &mut targets)
        .unwrap()
        .unwrap();
    assert_eq!(sink.current_path(), dir.path().join("svc.log.0"));

    writeln!(targets.stdout().unwrap(), "printed text").unwrap();
    writeln!(targets.stderr().unwrap(), "error text").unwrap();

    let contents = fs::read_to_string(dir.path().join("svc.log.0")).unwrap();
    assert!(contents.contains("STDOUT [stdout] printed text\n"));
    assert!(contents.contains("STDERR [stderr] error text\n"));
    assert!(console.records().is_empty());
}

#[test]
fn bad_file_config_fails_before_redirecting() {
    let config = LoggingConfig::from_toml_str(
        r#"
        redirect_std_streams = true

        [file]
        directory = "."
        process_id = "svc"
        file_count = 0
        "#,
    )
    .unwrap();

    let dispatcher = Dispatcher::new();
    let mut targets = HeldStreams::new();

    assert!(matches!(
        init_from_config(&dispatcher, &config, &mut targets),
        Err(Error::File(streamlog_logger_file::Error::InvalidArgument(_)))
    ));
    assert!(targets.stdout().is_none());
}
