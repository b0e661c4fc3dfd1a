//! Badge configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tictac_core::MachineSettings;
use tracing::{debug, info, instrument, warn};

/// Runtime settings for the badge simulator.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BadgeConfig {
    /// Minimum spacing between accepted A+C mode changes, in milliseconds.
    #[serde(default = "default_cooldown_ms")]
    cooldown_ms: u64,

    /// End the game on a full board with no winner.
    #[serde(default)]
    draw_ends_game: bool,

    /// JSON file holding the all-time score.
    #[serde(default = "default_score_file")]
    score_file: PathBuf,

    /// HTTP bind host.
    #[serde(default = "default_host")]
    host: String,

    /// HTTP bind port.
    #[serde(default = "default_port")]
    port: u16,

    /// Minimum time between display refreshes, in milliseconds.
    #[serde(default = "default_min_refresh_ms")]
    min_refresh_ms: u64,

    /// Added to the display's wait hint before a refresh retry, in milliseconds.
    #[serde(default = "default_retry_margin_ms")]
    retry_margin_ms: u64,

    /// Control loop poll interval, in milliseconds.
    #[serde(default = "default_poll_ms")]
    poll_ms: u64,

    /// Where tracing output goes while the terminal is in use.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_cooldown_ms() -> u64 {
    750
}

fn default_score_file() -> PathBuf {
    PathBuf::from("badge_scores.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_min_refresh_ms() -> u64 {
    1000
}

fn default_retry_margin_ms() -> u64 {
    600
}

fn default_poll_ms() -> u64 {
    20
}

fn default_log_file() -> PathBuf {
    PathBuf::from("badge.log")
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            draw_ends_game: false,
            score_file: default_score_file(),
            host: default_host(),
            port: default_port(),
            min_refresh_ms: default_min_refresh_ms(),
            retry_margin_ms: default_retry_margin_ms(),
            poll_ms: default_poll_ms(),
            log_file: default_log_file(),
        }
    }
}

impl BadgeConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(port = config.port, score_file = %config.score_file.display(), "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            warn!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        score_file: Option<PathBuf>,
        draw_ends_game: bool,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(score_file) = score_file {
            self.score_file = score_file;
        }
        self.draw_ends_game |= draw_ends_game;
        self
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Mode machine tunables.
    pub fn machine_settings(&self) -> MachineSettings {
        MachineSettings {
            cooldown: Duration::from_millis(self.cooldown_ms),
            draw_ends_game: self.draw_ends_game,
        }
    }

    /// Display refresh interval.
    pub fn min_refresh(&self) -> Duration {
        Duration::from_millis(self.min_refresh_ms)
    }

    /// Retry margin.
    pub fn retry_margin(&self) -> Duration {
        Duration::from_millis(self.retry_margin_ms)
    }

    /// Loop poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
