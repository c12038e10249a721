//! Configuration loading and typed config structures for a trivia session.
//!
//! The configuration lives in `trivia-config.yaml` next to the binary's
//! working directory. Every field has a default, so an empty file (or no
//! file at all) yields a usable configuration.
//!
//! ```yaml
//! session:
//!   max_players: 4
//!   seed: 7
//!   content_path: questions.json
//! output:
//!   report_path: game_report.txt
//!   event_log_path: game_event_log.csv
//! logging:
//!   level: info
//!   json: false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding [`OutputConfig::report_path`].
pub const REPORT_PATH_ENV: &str = "TRIVIA_REPORT_PATH";

/// Environment variable overriding [`OutputConfig::event_log_path`].
pub const EVENT_LOG_PATH_ENV: &str = "TRIVIA_EVENT_LOG_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level trivia configuration.
///
/// Mirrors the structure of `trivia-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TriviaConfig {
    /// Session rules.
    #[serde(default)]
    pub session: SessionConfig,

    /// Where the report and event log are written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TriviaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for output paths:
    /// - `TRIVIA_REPORT_PATH` overrides `output.report_path`
    /// - `TRIVIA_EVENT_LOG_PATH` overrides `output.event_log_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config
            .output
            .apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Same as [`TriviaConfig::parse`].
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty mapping.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_players == 0 {
            return Err(ConfigError::Invalid {
                field: "session.max_players",
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.output.report_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.report_path",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.output.event_log_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "output.event_log_path",
                reason: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

/// Session rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of registered players.
    #[serde(default = "default_max_players")]
    pub max_players: usize,

    /// Seed for first-player selection. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Content file used when none is given on the command line.
    #[serde(default)]
    pub content_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_players: default_max_players(),
            seed: None,
            content_path: None,
        }
    }
}

/// Output destinations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Text report path.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// CSV event log path.
    #[serde(default = "default_event_log_path")]
    pub event_log_path: PathBuf,
}

impl OutputConfig {
    /// Replace paths with values from `lookup` for the override variables
    /// it knows about. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(REPORT_PATH_ENV).filter(|v| !v.is_empty()) {
            self.report_path = PathBuf::from(val);
        }
        if let Some(val) = lookup(EVENT_LOG_PATH_ENV).filter(|v| !v.is_empty()) {
            self.event_log_path = PathBuf::from(val);
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            event_log_path: default_event_log_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_max_players() -> usize {
    4
}

fn default_report_path() -> PathBuf {
    PathBuf::from("game_report.txt")
}

fn default_event_log_path() -> PathBuf {
    PathBuf::from("game_event_log.csv")
}

fn default_log_level() -> String {
    "info".to_owned()
}
