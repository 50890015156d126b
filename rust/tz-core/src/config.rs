//! Configuration schema for the tenzies binaries.
//!
//! Every section and field has a default, so an empty YAML document is a
//! valid config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::BEST_SCORE_KEY;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Best score persistence.
    #[serde(default)]
    pub store: StoreConfig,
    /// Game clock.
    #[serde(default)]
    pub timer: TimerConfig,
    /// Dice randomness.
    #[serde(default)]
    pub rng: RngConfig,
    /// NDJSON event log.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Terminal front-end.
    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// File holding the best score record.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// If false, the best score lives only for the current process.
    #[serde(default = "default_true")]
    pub persist: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(format!("{BEST_SCORE_KEY}.json"))
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            persist: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimerConfig {
    /// Clock period in milliseconds. One period is one counted second.
    #[serde(default = "default_timer_period_ms")]
    pub period_ms: u64,
}

fn default_timer_period_ms() -> u64 {
    1000
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            period_ms: default_timer_period_ms(),
        }
    }
}

impl TimerConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RngConfig {
    /// Fixed seed for reproducible dice. None draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append game events here as NDJSON. None disables the log.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
    /// Flush after this many lines (0 = only on exit).
    #[serde(default)]
    pub flush_every_lines: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TuiConfig {
    /// Input poll timeout in milliseconds.
    #[serde(default = "default_tui_poll_ms")]
    pub poll_ms: u64,
}

fn default_tui_poll_ms() -> u64 {
    100
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            poll_ms: default_tui_poll_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer.period_ms == 0 {
            return Err(ConfigError::Invalid("timer.period_ms must be > 0"));
        }
        if self.tui.poll_ms == 0 {
            return Err(ConfigError::Invalid("tui.poll_ms must be > 0"));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
