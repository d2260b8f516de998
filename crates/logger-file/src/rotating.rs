//! Rotating file destination

use crate::{Error, Result, RotatingFileConfig};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use streamlog_logger::{AtomicLevel, Destination, Formatter, Level, PlainTextFormatter, Record};
use tracing::{debug, warn};

/// Currently open generation 0 and how much has been written to it
struct ActiveFile {
    writer: Option<BufWriter<File>>,
    written: u64,
}

/// Destination writing formatted records to `{directory}/{processId}.log.{g}`.
///
/// Generation 0 is always the file being written. Once it reaches the byte
/// limit the generations shift up by one, the oldest is discarded, and a
/// fresh generation 0 is started. Output is always UTF-8.
pub struct RotatingFileSink {
    config: RotatingFileConfig,
    min_level: AtomicLevel,
    formatter: Box<dyn Formatter>,
    active: Mutex<ActiveFile>,
    /// Set while writes are failing, so each failure burst is reported once
    failing: AtomicBool,
}

/// Build a rotating file sink with a plain-text formatter.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `byte_limit < 0` or `file_count < 1`
/// - [`Error::CreateDirectory`] if the directory cannot be created, including
///   when the OS refuses access
/// - [`Error::Open`] if a log file cannot be opened, including when the OS
///   refuses access
/// - [`Error::Io`] if rotating existing generations fails
pub fn create_rotating_file_sink(
    process_id: &str,
    directory: impl AsRef<Path>,
    append: bool,
    byte_limit: i64,
    file_count: i32,
) -> Result<RotatingFileSink> {
    let config = RotatingFileConfig::builder()
        .directory(directory)
        .process_id(process_id)
        .append(append)
        .byte_limit(byte_limit)
        .file_count(file_count)
        .build()?;

    RotatingFileSink::new(config)
}

impl RotatingFileSink {
    /// Open the sink described by `config`
    ///
    /// # Errors
    ///
    /// See [`create_rotating_file_sink`].
    pub fn new(config: RotatingFileConfig) -> Result<Self> {
        config.validate()?;

        fs::create_dir_all(&config.directory)
            .map_err(|source| Error::CreateDirectory {
                path: config.directory.clone(),
                source,
            })?;

        let active = if config.append {
            open_append(&config.path_for(0))?
        } else {
            shift_generations(&config)?;
            open_truncate(&config.path_for(0))?
        };

        debug!(
            "opened rotating log {} (limit {} bytes, {} files)",
            config.path_for(0).display(),
            config.byte_limit,
            config.file_count
        );

        Ok(Self {
            config,
            min_level: AtomicLevel::new(Level::Trace),
            formatter: Box::new(PlainTextFormatter),
            active: Mutex::new(active),
            failing: AtomicBool::new(false),
        })
    }

    /// Replace the formatter
    pub fn with_formatter(mut self, formatter: impl Formatter) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Create with a specific minimum level
    pub fn with_level(self, level: Level) -> Self {
        self.min_level.store(level);
        self
    }

    /// The sink's configuration
    pub fn config(&self) -> &RotatingFileConfig {
        &self.config
    }

    /// Path of the file currently being written
    pub fn current_path(&self) -> PathBuf {
        self.config.path_for(0)
    }

    /// Format, write and flush one record, rotating afterwards if the limit
    /// was reached
    fn write_record(&self, record: &Record) -> Result<()> {
        let line = self.formatter.format(record);
        let mut active = self.active.lock();

        if active.writer.is_none() {
            // A previous rotation failed half way; start generation 0 again.
            *active = open_truncate(&self.config.path_for(0))?;
        }

        if let Some(writer) = active.writer.as_mut() {
            writer.write_all(line.as_bytes())?;
            writer.flush()?;
        }
        active.written += line.len() as u64;

        if self.config.limit().is_some_and(|limit| active.written >= limit) {
            self.rotate(&mut active)?;
        }
        Ok(())
    }

    fn rotate(&self, active: &mut ActiveFile) -> Result<()> {
        if let Some(mut writer) = active.writer.take() {
            writer.flush()?;
        }
        shift_generations(&self.config)?;
        *active = open_truncate(&self.config.path_for(0))?;
        Ok(())
    }
}

impl Destination for RotatingFileSink {
    fn publish(&self, record: &Record) {
        match self.write_record(record) {
            Ok(()) => self.failing.store(false, Ordering::Relaxed),
            Err(e) => {
                // Reporting may route straight back here through a bridge.
                if !self.failing.swap(true, Ordering::Relaxed) {
                    warn!(
                        "failed to write log file {}: {}",
                        self.current_path().display(),
                        e
                    );
                }
            }
        }
    }

    fn flush(&self) {
        if let Some(writer) = self.active.lock().writer.as_mut() {
            let _ = writer.flush();
        }
    }

    fn level(&self) -> Level {
        self.min_level.load()
    }

    fn set_level(&self, level: Level) {
        self.min_level.store(level);
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("config", &self.config)
            .field("min_level", &self.level())
            .finish()
    }
}

fn open_append(path: &Path) -> Result<ActiveFile> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let written = file.metadata()?.len();

    Ok(ActiveFile {
        writer: Some(BufWriter::new(file)),
        written,
    })
}

fn open_truncate(path: &Path) -> Result<ActiveFile> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(ActiveFile {
        writer: Some(BufWriter::new(file)),
        written: 0,
    })
}

/// Move generation `i` to `i + 1` from the top down, dropping the oldest.
///
/// Runs with the sink lock held, so it must not emit log events.
fn shift_generations(config: &RotatingFileConfig) -> Result<()> {
    for generation in (0..config.generations() - 1).rev() {
        let from = config.path_for(generation);
        if !from.exists() {
            continue;
        }

        let to = config.path_for(generation + 1);
        if to.exists() {
            fs::remove_file(&to)?;
        }
        fs::rename(&from, &to)?;
    }
    Ok(())
}
