//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `livecal.toml` in the working directory, or the file named by
//! `LIVECAL_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use livecal_domain::config::LiveEventConfig;

/// Default configuration file name.
pub const DEFAULT_PATH: &str = "livecal.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Offset and text filter of the live event.
    pub live_event: LiveEventConfig,
    /// Where events come from.
    pub calendar: CalendarConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Events file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// TOML or JSON file holding the events.
    pub events_file: PathBuf,
    /// How often the file is read again, in seconds.
    pub reload_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("LIVECAL_OFFSET") {
            let offset = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("LIVECAL_OFFSET is not a number of seconds: {val}"))
            })?;
            self.live_event.offset = Some(offset);
        }
        if let Some(val) = lookup("LIVECAL_EVENTS") {
            self.calendar.events_file = PathBuf::from(val);
        }
        if let Some(val) = lookup("LIVECAL_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.calendar.reload_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "reload interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Location of the configuration file.
    #[must_use]
    pub fn path_from_env() -> PathBuf {
        std::env::var_os("LIVECAL_CONFIG").map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from)
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            events_file: PathBuf::from("events.toml"),
            reload_interval_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "livecald=info,livecal_app=info,livecal_adapter_static_calendar=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
