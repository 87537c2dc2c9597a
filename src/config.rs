//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub machine: MachineConfig,

    #[serde(default)]
    pub drive: DriveConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the machine is loaded from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Folder holding `states.csv` and `transitions.csv`
    #[serde(default = "default_machine_directory")]
    pub directory: PathBuf,

    /// Name of the state to start in. The first state when unset.
    pub initial_state: Option<String>,
}

/// Settings for replaying observations against a machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Polling interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Observations below this confidence are ignored
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Driving stops once this state is entered
    #[serde(default = "default_terminal_state")]
    pub terminal_state: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_machine_directory() -> PathBuf {
    PathBuf::from("resources/menu")
}

fn default_interval_ms() -> u64 {
    33
}

fn default_min_confidence() -> f32 {
    0.95
}

fn default_terminal_state() -> String {
    "end".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            directory: default_machine_directory(),
            initial_state: None,
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            min_confidence: default_min_confidence(),
            terminal_state: default_terminal_state(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DriveConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Reject a zero interval and a confidence threshold outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "drive.min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.interval_ms == 0 {
            return Err(Error::Config(
                "drive.interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents).map_err(|e| Error::ConfigParse {
            file: path.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./ui-fsm.toml
    /// 2. ~/.ui-fsm/config.toml
    /// 3. /etc/ui-fsm/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("ui-fsm.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ui-fsm").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/ui-fsm/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    fn validate(&self) -> Result<()> {
        self.drive.validate()
    }
}
