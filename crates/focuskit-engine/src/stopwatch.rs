//! Elapsed-time counter with lap recording.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::format::format_stopwatch;
use crate::scheduler::{Tick, TickScheduler, TickSink, TimerId};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Scheduler interval for the stopwatch.
pub const STOPWATCH_INTERVAL: Duration = Duration::from_millis(10);

/// Nominal milliseconds added per tick.
pub const STOPWATCH_STEP_MS: u64 = 10;

/// A recorded split time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LapRecord {
    /// 1-based lap number.
    pub number: usize,
    /// Elapsed time when the lap was recorded.
    pub cumulative_ms: u64,
    /// Time since the previous lap (or since start for the first lap).
    pub delta_ms: u64,
}

/// Counts up from zero in fixed 10 ms steps.
#[derive(Debug)]
pub struct Stopwatch {
    elapsed_ms: u64,
    laps: Vec<LapRecord>,
    scheduler: TickScheduler,
    analytics: Analytics,
}

impl Stopwatch {
    pub fn new(sink: Option<TickSink>, analytics: Analytics) -> Self {
        Self {
            elapsed_ms: 0,
            laps: Vec::new(),
            scheduler: TickScheduler::new(TimerId::Stopwatch, STOPWATCH_INTERVAL, sink),
            analytics,
        }
    }

    /// A host-driven stopwatch with analytics disabled.
    pub fn manual() -> Self {
        Self::new(None, Analytics::disabled())
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Formatted elapsed time.
    pub fn display(&self) -> String {
        format_stopwatch(self.elapsed_ms)
    }

    /// Start or pause.
    pub fn toggle(&mut self) {
        if self.scheduler.is_active() {
            self.scheduler.stop();
        } else {
            self.scheduler.start();
            self.analytics.emit(AnalyticsEvent::StopwatchStart);
        }
    }

    /// Advance by one nominal step if running.
    pub fn tick(&mut self) {
        if !self.scheduler.is_active() {
            return;
        }
        self.elapsed_ms += STOPWATCH_STEP_MS;
    }

    /// Apply a scheduled tick. Returns whether it was accepted.
    pub fn handle_tick(&mut self, tick: &Tick) -> bool {
        if !self.scheduler.accepts(tick) {
            return false;
        }
        self.tick();
        true
    }

    /// Record a lap. Returns `None` while stopped.
    pub fn lap(&mut self) -> Option<LapRecord> {
        if !self.scheduler.is_active() {
            return None;
        }
        let previous = self.laps.last().map_or(0, |lap| lap.cumulative_ms);
        let record = LapRecord {
            number: self.laps.len() + 1,
            cumulative_ms: self.elapsed_ms,
            delta_ms: self.elapsed_ms - previous,
        };
        self.laps.push(record);
        debug!(lap = record.number, cumulative_ms = record.cumulative_ms, "lap recorded");
        self.analytics.emit(AnalyticsEvent::StopwatchLap {
            lap_number: record.number,
        });
        Some(record)
    }

    /// Stop, zero the counter and discard all laps.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        self.elapsed_ms = 0;
        self.laps.clear();
    }

    /// Stop the scheduler without touching the counter.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }
}
