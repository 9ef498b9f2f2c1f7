//! Configuration for focuskit.
//!
//! Stored as JSON in `.focuskit/config.json`. Every field has a default, so
//! a partial file is valid.

use crate::countdown::CountdownDuration;
use crate::focus::{DEFAULT_VOLUME, MAX_VOLUME};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Smallest UI tick rate accepted, in milliseconds.
pub const MIN_TICK_RATE_MS: u64 = 16;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pomodoro: PomodoroConfig,

    /// Initial countdown duration.
    #[serde(default = "default_countdown")]
    pub countdown: CountdownDuration,

    #[serde(default)]
    pub focus: FocusConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_countdown() -> CountdownDuration {
    CountdownDuration::new(0, 5, 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pomodoro: PomodoroConfig::default(),
            countdown: default_countdown(),
            focus: FocusConfig::default(),
            ui: UiConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

/// Pomodoro phase lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,

    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Initial ambient volume in percent.
    #[serde(default = "default_volume")]
    pub volume: u8,
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Redraw interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate_ms() -> u64 {
    250
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Record analytics events to `.focuskit/analytics.jsonl`.
    #[serde(default = "default_analytics_enabled")]
    pub enabled: bool,
}

fn default_analytics_enabled() -> bool {
    true
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_analytics_enabled(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        Ok(config.sanitized())
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Clamp every value into its valid range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.pomodoro.work_minutes = self.pomodoro.work_minutes.max(1);
        self.pomodoro.break_minutes = self.pomodoro.break_minutes.max(1);
        self.countdown = self.countdown.clamped();
        self.focus.volume = self.focus.volume.min(MAX_VOLUME);
        self.ui.tick_rate_ms = self.ui.tick_rate_ms.max(MIN_TICK_RATE_MS);
        self
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
