//! Countdown timer with a configurable hours/minutes/seconds duration.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::format::{format_countdown, progress_percent};
use crate::scheduler::{Tick, TickScheduler, TickSink, TimerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Scheduler interval for the countdown.
pub const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Countdown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownStatus {
    /// Duration is being configured.
    #[default]
    Setup,
    /// Counting down.
    Running,
    /// Started but paused.
    Paused,
    /// Reached zero; terminal until reset.
    Finished,
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// One of the adjustable duration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationField {
    Hours,
    #[default]
    Minutes,
    Seconds,
}

impl DurationField {
    /// Largest value the field may hold.
    pub fn max(self) -> u8 {
        match self {
            Self::Hours => 23,
            Self::Minutes | Self::Seconds => 59,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Hours => Self::Minutes,
            Self::Minutes | Self::Seconds => Self::Seconds,
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Seconds => Self::Minutes,
            Self::Minutes | Self::Hours => Self::Hours,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Minutes => "mins",
            Self::Seconds => "secs",
        }
    }
}

/// Configured countdown length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownDuration {
    #[serde(default)]
    pub hours: u8,
    #[serde(default)]
    pub minutes: u8,
    #[serde(default)]
    pub seconds: u8,
}

impl CountdownDuration {
    /// Build a duration with each field clamped to its range.
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: hours.min(DurationField::Hours.max()),
            minutes: minutes.min(DurationField::Minutes.max()),
            seconds: seconds.min(DurationField::Seconds.max()),
        }
    }

    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.hours, self.minutes, self.seconds)
    }

    pub fn total_seconds(self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn get(self, field: DurationField) -> u8 {
        match field {
            DurationField::Hours => self.hours,
            DurationField::Minutes => self.minutes,
            DurationField::Seconds => self.seconds,
        }
    }

    /// Saturating +1/-1 within the field's range.
    pub fn adjust(&mut self, field: DurationField, increment: bool) {
        let value = self.get(field);
        let next = if increment {
            value.saturating_add(1).min(field.max())
        } else {
            value.saturating_sub(1)
        };
        match field {
            DurationField::Hours => self.hours = next,
            DurationField::Minutes => self.minutes = next,
            DurationField::Seconds => self.seconds = next,
        }
    }
}

/// Counts down from a configured duration to zero in 1 s steps.
#[derive(Debug)]
pub struct CountdownTimer {
    duration: CountdownDuration,
    remaining: u64,
    total: u64,
    status: CountdownStatus,
    label: String,
    scheduler: TickScheduler,
    analytics: Analytics,
}

impl CountdownTimer {
    pub fn new(duration: CountdownDuration, sink: Option<TickSink>, analytics: Analytics) -> Self {
        Self {
            duration: duration.clamped(),
            remaining: 0,
            total: 0,
            status: CountdownStatus::Setup,
            label: String::new(),
            scheduler: TickScheduler::new(TimerId::Countdown, COUNTDOWN_INTERVAL, sink),
            analytics,
        }
    }

    /// A host-driven countdown with analytics disabled.
    pub fn manual(duration: CountdownDuration) -> Self {
        Self::new(duration, None, Analytics::disabled())
    }

    pub fn duration(&self) -> CountdownDuration {
        self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Duration captured when the current run started (0 in setup).
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.status == CountdownStatus::Finished
    }

    /// Percentage of the run already elapsed.
    pub fn progress(&self) -> f64 {
        progress_percent(self.total, self.remaining)
    }

    /// Formatted remaining time.
    pub fn display(&self) -> String {
        format_countdown(self.remaining)
    }

    /// Replace the configured duration. Only honored during setup.
    pub fn set_duration(&mut self, hours: u8, minutes: u8, seconds: u8) {
        if self.status != CountdownStatus::Setup {
            return;
        }
        self.duration = CountdownDuration::new(hours, minutes, seconds);
    }

    /// Nudge one field up or down. Only honored during setup.
    pub fn adjust(&mut self, field: DurationField, increment: bool) {
        if self.status != CountdownStatus::Setup {
            return;
        }
        self.duration.adjust(field, increment);
    }

    /// Set the free-text label. Only honored during setup.
    pub fn set_label(&mut self, label: impl Into<String>) {
        if self.status != CountdownStatus::Setup {
            return;
        }
        self.label = label.into();
    }

    /// Begin counting down from the configured duration.
    ///
    /// Refused silently when the duration is zero or a run already exists.
    pub fn start(&mut self) {
        if self.status != CountdownStatus::Setup {
            return;
        }
        let total = self.duration.total_seconds();
        if total == 0 {
            debug!("countdown start refused: zero duration");
            return;
        }
        self.total = total;
        self.remaining = total;
        self.status = CountdownStatus::Running;
        self.scheduler.start();
        self.analytics.emit(AnalyticsEvent::CountdownStart {
            duration_seconds: total,
            has_label: !self.label.is_empty(),
        });
    }

    /// Start from setup, otherwise pause or resume. No-op once finished.
    pub fn toggle(&mut self) {
        match self.status {
            CountdownStatus::Setup => self.start(),
            CountdownStatus::Running => {
                self.scheduler.stop();
                self.status = CountdownStatus::Paused;
            }
            CountdownStatus::Paused => {
                self.scheduler.start();
                self.status = CountdownStatus::Running;
            }
            CountdownStatus::Finished => {}
        }
    }

    /// Advance by one second if running.
    pub fn tick(&mut self) {
        if self.status != CountdownStatus::Running {
            return;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.status = CountdownStatus::Finished;
            self.scheduler.stop();
            info!(duration_seconds = self.total, "countdown finished");
            self.analytics.emit(AnalyticsEvent::CountdownComplete {
                duration_seconds: self.total,
            });
        } else {
            self.remaining -= 1;
        }
    }

    /// Apply a scheduled tick. Returns whether it was accepted.
    pub fn handle_tick(&mut self, tick: &Tick) -> bool {
        if !self.scheduler.accepts(tick) {
            return false;
        }
        self.tick();
        true
    }

    /// Return to setup, discarding the current run.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.remaining = 0;
        self.total = 0;
        self.status = CountdownStatus::Setup;
    }

    /// Stop the scheduler without changing status.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_minutes() -> CountdownTimer {
        CountdownTimer::manual(CountdownDuration::new(0, 5, 0))
    }

    #[test]
    fn test_five_minute_run_finishes() {
        let mut cd = five_minutes();
        cd.start();
        assert_eq!(cd.status(), CountdownStatus::Running);
        assert_eq!(cd.remaining(), 300);

        for _ in 0..300 {
            cd.tick();
        }
        assert_eq!(cd.remaining(), 0);
        assert!(cd.is_finished());
        assert!(!cd.is_running());
    }

    #[test]
    fn test_any_duration_finishes_after_exact_ticks() {
        for secs in [1u8, 2, 59] {
            let mut cd = CountdownTimer::manual(CountdownDuration::new(0, 0, secs));
            cd.start();
            for _ in 0..secs {
                assert!(!cd.is_finished());
                cd.tick();
            }
            assert_eq!(cd.remaining(), 0);
            assert!(cd.is_finished());
        }
    }

    #[test]
    fn test_extra_ticks_never_go_negative() {
        let mut cd = CountdownTimer::manual(CountdownDuration::new(0, 0, 2));
        cd.start();
        for _ in 0..10 {
            cd.tick();
        }
        assert_eq!(cd.remaining(), 0);
    }

    #[test]
    fn test_zero_duration_start_refused() {
        let mut cd = CountdownTimer::manual(CountdownDuration::default());
        cd.start();
        assert_eq!(cd.status(), CountdownStatus::Setup);
        assert!(!cd.is_running());

        cd.toggle();
        assert_eq!(cd.status(), CountdownStatus::Setup);
    }

    #[test]
    fn test_hours_decrement_clamped_at_zero() {
        let mut cd = five_minutes();
        cd.adjust(DurationField::Hours, false);
        assert_eq!(cd.duration().hours, 0);
    }

    #[test]
    fn test_adjust_saturates_at_max() {
        let mut cd = CountdownTimer::manual(CountdownDuration::new(23, 59, 59));
        cd.adjust(DurationField::Hours, true);
        cd.adjust(DurationField::Minutes, true);
        cd.adjust(DurationField::Seconds, true);
        assert_eq!(cd.duration(), CountdownDuration::new(23, 59, 59));
    }

    #[test]
    fn test_set_duration_clamps_fields() {
        let mut cd = five_minutes();
        cd.set_duration(40, 75, 60);
        assert_eq!(cd.duration(), CountdownDuration::new(23, 59, 59));
    }

    #[test]
    fn test_configuration_locked_after_start() {
        let mut cd = five_minutes();
        cd.set_label("tea");
        cd.start();
        cd.adjust(DurationField::Minutes, true);
        cd.set_duration(1, 0, 0);
        cd.set_label("coffee");
        assert_eq!(cd.duration().minutes, 5);
        assert_eq!(cd.duration().hours, 0);
        assert_eq!(cd.label(), "tea");

        cd.toggle();
        assert_eq!(cd.status(), CountdownStatus::Paused);
        cd.adjust(DurationField::Minutes, true);
        assert_eq!(cd.duration().minutes, 5);
    }

    #[test]
    fn test_toggle_pause_resume_keeps_remaining() {
        let mut cd = five_minutes();
        cd.toggle();
        cd.tick();
        cd.toggle();
        assert_eq!(cd.status(), CountdownStatus::Paused);
        cd.tick();
        assert_eq!(cd.remaining(), 299);

        cd.toggle();
        assert_eq!(cd.status(), CountdownStatus::Running);
        cd.tick();
        assert_eq!(cd.remaining(), 298);
    }

    #[test]
    fn test_finished_is_terminal_until_reset() {
        let mut cd = CountdownTimer::manual(CountdownDuration::new(0, 0, 1));
        cd.start();
        cd.tick();
        assert!(cd.is_finished());

        cd.toggle();
        assert!(cd.is_finished());
        assert!(!cd.is_running());

        cd.reset();
        assert_eq!(cd.status(), CountdownStatus::Setup);
        assert_eq!(cd.remaining(), 0);
        assert!(!cd.is_finished());
    }

    #[test]
    fn test_reset_idempotent() {
        let mut cd = five_minutes();
        cd.start();
        cd.tick();
        cd.reset();
        let once = (cd.status(), cd.remaining(), cd.total(), cd.is_running());
        cd.reset();
        let twice = (cd.status(), cd.remaining(), cd.total(), cd.is_running());
        assert_eq!(once, twice);
        assert_eq!(cd.duration(), CountdownDuration::new(0, 5, 0));
    }

    #[test]
    fn test_progress_monotonic_and_reset() {
        let mut cd = CountdownTimer::manual(CountdownDuration::new(0, 0, 10));
        assert!(cd.progress().abs() < f64::EPSILON);
        cd.start();

        let mut last = cd.progress();
        for _ in 0..10 {
            cd.tick();
            let now = cd.progress();
            assert!(now >= last);
            last = now;
        }
        assert!((last - 100.0).abs() < f64::EPSILON);

        cd.reset();
        assert!(cd.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn test_stale_tick_rejected_after_pause() {
        let mut cd = five_minutes();
        cd.start();
        let tick = Tick {
            source: TimerId::Countdown,
            generation: 1,
        };
        cd.toggle();
        assert!(!cd.handle_tick(&tick));
        assert_eq!(cd.remaining(), 300);
    }

    #[test]
    fn test_display_switches_to_hours() {
        let mut cd = CountdownTimer::manual(CountdownDuration::new(1, 0, 0));
        cd.start();
        assert_eq!(cd.display(), "01:00:00");
        cd.tick();
        assert_eq!(cd.display(), "59:59");
    }

    #[test]
    fn test_analytics_start_and_complete() {
        let (analytics, mut rx) = Analytics::channel();
        let mut cd = CountdownTimer::new(CountdownDuration::new(0, 0, 2), None, analytics);
        cd.set_label("stretch");
        cd.start();
        cd.tick();
        cd.tick();

        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::CountdownStart {
                duration_seconds: 2,
                has_label: true
            }
        );
        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::CountdownComplete {
                duration_seconds: 2
            }
        );
    }

    #[test]
    fn test_field_navigation() {
        assert_eq!(DurationField::Hours.prev(), DurationField::Hours);
        assert_eq!(DurationField::Hours.next(), DurationField::Minutes);
        assert_eq!(DurationField::Seconds.next(), DurationField::Seconds);
        assert_eq!(DurationField::Seconds.prev(), DurationField::Minutes);
    }
}
