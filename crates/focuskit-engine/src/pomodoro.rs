//! Pomodoro timer alternating work and break phases.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::config::PomodoroConfig;
use crate::format::{format_countdown, progress_percent};
use crate::scheduler::{Tick, TickScheduler, TickSink, TimerId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Scheduler interval for the pomodoro.
pub const POMODORO_INTERVAL: Duration = Duration::from_secs(1);

/// Pomodoro phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    /// Title shown above the timer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work Time",
            Self::Break => "Break Time",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => write!(f, "work"),
            Self::Break => write!(f, "break"),
        }
    }
}

/// Counts down work and break phases back to back.
#[derive(Debug)]
pub struct PomodoroTimer {
    work_minutes: u32,
    break_minutes: u32,
    phase: Phase,
    remaining: u64,
    completed_sessions: u32,
    scheduler: TickScheduler,
    analytics: Analytics,
}

impl PomodoroTimer {
    pub fn new(config: &PomodoroConfig, sink: Option<TickSink>, analytics: Analytics) -> Self {
        let work_minutes = config.work_minutes.max(1);
        Self {
            work_minutes,
            break_minutes: config.break_minutes.max(1),
            phase: Phase::Work,
            remaining: u64::from(work_minutes) * 60,
            completed_sessions: 0,
            scheduler: TickScheduler::new(TimerId::Pomodoro, POMODORO_INTERVAL, sink),
            analytics,
        }
    }

    /// A host-driven pomodoro with analytics disabled.
    pub fn manual(config: &PomodoroConfig) -> Self {
        Self::new(config, None, Analytics::disabled())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// 1-based number of the session in progress.
    pub fn session_number(&self) -> u32 {
        self.completed_sessions + 1
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn work_minutes(&self) -> u32 {
        self.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Full length of the current phase in seconds.
    pub fn phase_total(&self) -> u64 {
        self.phase_seconds(self.phase)
    }

    fn phase_seconds(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => u64::from(self.work_minutes) * 60,
            Phase::Break => u64::from(self.break_minutes) * 60,
        }
    }

    pub fn progress(&self) -> f64 {
        progress_percent(self.phase_total(), self.remaining)
    }

    pub fn display(&self) -> String {
        format_countdown(self.remaining)
    }

    /// Pause or resume without touching the remaining time.
    pub fn toggle(&mut self) {
        if self.scheduler.is_active() {
            self.scheduler.stop();
        } else {
            self.scheduler.start();
            self.analytics.emit(AnalyticsEvent::PomodoroStart {
                session_type: self.phase,
            });
        }
    }

    /// Advance by one second if running, rolling into the next phase at zero.
    pub fn tick(&mut self) {
        if !self.scheduler.is_active() {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return;
        }

        let completed = self.phase;
        if completed == Phase::Work {
            self.completed_sessions += 1;
        }
        self.phase = completed.next();
        self.remaining = self.phase_total();
        info!(
            completed = %completed,
            sessions = self.completed_sessions,
            "pomodoro phase complete"
        );
        self.analytics.emit(AnalyticsEvent::PomodoroComplete {
            session_type: completed,
        });
    }

    /// Apply a scheduled tick. Returns whether it was accepted.
    pub fn handle_tick(&mut self, tick: &Tick) -> bool {
        if !self.scheduler.accepts(tick) {
            return false;
        }
        self.tick();
        true
    }

    /// Stop and return to the start of a work phase. Completed sessions stay.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.phase = Phase::Work;
        self.remaining = self.phase_total();
        debug!(sessions = self.completed_sessions, "pomodoro reset");
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(work: u32, brk: u32) -> PomodoroConfig {
        PomodoroConfig {
            work_minutes: work,
            break_minutes: brk,
        }
    }

    fn run_ticks(p: &mut PomodoroTimer, n: u64) {
        for _ in 0..n {
            p.tick();
        }
    }

    #[test]
    fn test_starts_in_work_phase() {
        let p = PomodoroTimer::manual(&PomodoroConfig::default());
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.remaining(), 1_500);
        assert_eq!(p.display(), "25:00");
        assert_eq!(p.session_number(), 1);
        assert!(!p.is_running());
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Work.label(), "Work Time");
        assert_eq!(Phase::Break.label(), "Break Time");
    }

    #[test]
    fn test_full_work_phase_rolls_into_break() {
        let mut p = PomodoroTimer::manual(&PomodoroConfig::default());
        p.toggle();
        run_ticks(&mut p, 1_500);

        assert_eq!(p.phase(), Phase::Break);
        assert_eq!(p.completed_sessions(), 1);
        assert_eq!(p.remaining(), 300);
        assert!(p.is_running());
    }

    #[test]
    fn test_break_to_work_does_not_count_session() {
        let mut p = PomodoroTimer::manual(&config(1, 1));
        p.toggle();
        run_ticks(&mut p, 60);
        assert_eq!(p.phase(), Phase::Break);
        run_ticks(&mut p, 60);
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.completed_sessions(), 1);
        assert_eq!(p.remaining(), 60);
    }

    #[test]
    fn test_ticks_ignored_while_paused() {
        let mut p = PomodoroTimer::manual(&PomodoroConfig::default());
        p.toggle();
        run_ticks(&mut p, 10);
        p.toggle();
        run_ticks(&mut p, 10);
        assert_eq!(p.remaining(), 1_490);
    }

    #[test]
    fn test_reset_keeps_sessions() {
        let mut p = PomodoroTimer::manual(&config(1, 5));
        p.toggle();
        run_ticks(&mut p, 90);
        assert_eq!(p.phase(), Phase::Break);

        p.reset();
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.remaining(), 60);
        assert_eq!(p.completed_sessions(), 1);
        assert_eq!(p.session_number(), 2);
        assert!(!p.is_running());
        assert!(p.progress().abs() < f64::EPSILON);

        p.reset();
        assert_eq!(p.remaining(), 60);
        assert_eq!(p.completed_sessions(), 1);
    }

    #[test]
    fn test_progress_monotonic_within_phase() {
        let mut p = PomodoroTimer::manual(&config(1, 1));
        p.toggle();
        let mut last = p.progress();
        for _ in 0..59 {
            p.tick();
            let now = p.progress();
            assert!(now >= last);
            last = now;
        }
        assert!(last < 100.0);
    }

    #[test]
    fn test_zero_minutes_raised_to_one() {
        let p = PomodoroTimer::manual(&config(0, 0));
        assert_eq!(p.work_minutes(), 1);
        assert_eq!(p.break_minutes(), 1);
        assert_eq!(p.remaining(), 60);
    }

    #[test]
    fn test_stale_tick_rejected_after_reset() {
        let mut p = PomodoroTimer::manual(&PomodoroConfig::default());
        p.toggle();
        let tick = Tick {
            source: TimerId::Pomodoro,
            generation: 1,
        };
        assert!(p.handle_tick(&tick));
        p.reset();
        assert!(!p.handle_tick(&tick));
        assert_eq!(p.remaining(), 1_500);
    }

    #[test]
    fn test_analytics_start_and_complete() {
        let (analytics, mut rx) = Analytics::channel();
        let mut p = PomodoroTimer::new(&config(1, 1), None, analytics);
        p.toggle();
        run_ticks(&mut p, 60);
        p.toggle();
        p.toggle();

        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::PomodoroStart {
                session_type: Phase::Work
            }
        );
        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::PomodoroComplete {
                session_type: Phase::Work
            }
        );
        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::PomodoroStart {
                session_type: Phase::Break
            }
        );
        assert!(rx.try_recv().is_err());
    }
}
