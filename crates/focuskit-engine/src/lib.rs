//! focuskit-engine: Headless interval timer model
//!
//! This crate provides the timer logic behind focuskit, including:
//! - Tick scheduling with hard cancellation
//! - Stopwatch, countdown and pomodoro timers
//! - Focus mode and the live clock
//! - Analytics events and configuration

pub mod analytics;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod focus;
pub mod format;
pub mod pomodoro;
pub mod scheduler;
pub mod stopwatch;
pub mod tools;

// Re-export commonly used types
pub use analytics::{
    spawn_jsonl_recorder, Analytics, AnalyticsError, AnalyticsEvent, AnalyticsRecord,
};
pub use clock::LiveClock;
pub use config::{Config, ConfigError, PomodoroConfig};
pub use countdown::{CountdownDuration, CountdownStatus, CountdownTimer, DurationField};
pub use focus::{AmbientSound, FocusMode};
pub use format::{format_countdown, format_stopwatch, progress_percent};
pub use pomodoro::{Phase, PomodoroTimer};
pub use scheduler::{Tick, TickScheduler, TickSink, TimerId};
pub use stopwatch::{LapRecord, Stopwatch};
pub use tools::{ToolKind, Toolbox};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
