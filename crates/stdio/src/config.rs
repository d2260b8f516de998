//! Logging configuration loaded from TOML

use crate::{Error, Result, StreamTargets, attach_destination, initialize};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::sync::Arc;
use streamlog_logger::{Dispatcher, Level};
use streamlog_logger_file::{RotatingFileConfig, RotatingFileSink};

/// Everything [`init_from_config`] needs.
///
/// ```toml
/// level = "info"
/// redirect_std_streams = true
///
/// [file]
/// directory = "/var/log/worker"
/// process_id = "4242"
/// byte_limit = 1048576
/// file_count = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Root level, applied to every destination
    #[serde(default = "default_level", deserialize_with = "level_by_name")]
    pub level: Level,
    /// Capture stdout and stderr into the dispatcher
    #[serde(default)]
    pub redirect_std_streams: bool,
    /// Optional rotating log files
    #[serde(default)]
    pub file: Option<RotatingFileConfig>,
}

fn default_level() -> Level {
    Level::Info
}

fn level_by_name<'de, D>(deserializer: D) -> std::result::Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            redirect_std_streams: false,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed TOML or an unknown level name.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`LoggingConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Io("reading logging config", e))?;
        Self::from_toml_str(&source)
    }
}

/// Apply `config` to `dispatcher`: open the file sink (if any), run
/// [`initialize`], then attach the sink.
///
/// The sink is opened first so a bad file config fails before the standard
/// streams are touched. Returns the attached sink.
///
/// # Errors
///
/// Any error from [`RotatingFileSink::new`], [`initialize`], or
/// [`attach_destination`].
pub fn init_from_config(
    dispatcher: &Dispatcher,
    config: &LoggingConfig,
    targets: &mut dyn StreamTargets,
) -> Result<Option<Arc<RotatingFileSink>>> {
    let sink = config
        .file
        .clone()
        .map(RotatingFileSink::new)
        .transpose()?
        .map(Arc::new);

    initialize(dispatcher, config.level, config.redirect_std_streams, targets)?;

    if let Some(sink) = &sink {
        attach_destination(dispatcher, sink.clone())?;
    }
    Ok(sink)
}
