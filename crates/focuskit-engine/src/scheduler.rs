//! Tick scheduling for interval timers.
//!
//! Every timer owns exactly one [`TickScheduler`]. A scheduler with a sink
//! spawns a tokio interval task that sends [`Tick`] messages to the owner's
//! event loop; the owner applies a tick only if [`TickScheduler::accepts`]
//! it. A scheduler without a sink is driven by the host calling the timer's
//! nominal `tick()` directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Identifies the timer a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerId {
    Pomodoro,
    Stopwatch,
    Countdown,
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pomodoro => write!(f, "pomodoro"),
            Self::Stopwatch => write!(f, "stopwatch"),
            Self::Countdown => write!(f, "countdown"),
        }
    }
}

/// One scheduled invocation of a timer's update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Timer whose scheduler produced this tick.
    pub source: TimerId,
    /// Scheduler generation at the time the tick was produced.
    pub generation: u64,
}

/// Channel end that spawned schedulers deliver ticks into.
pub type TickSink = mpsc::UnboundedSender<Tick>;

/// Repeating tick source owned by a single timer.
///
/// At most one interval task exists per scheduler. Dropping the scheduler
/// stops it.
#[derive(Debug)]
pub struct TickScheduler {
    source: TimerId,
    interval: Duration,
    generation: u64,
    active: bool,
    sink: Option<TickSink>,
    task: Option<JoinHandle<()>>,
}

impl TickScheduler {
    /// Create a scheduler. With a sink, `start()` spawns an interval task;
    /// without one, ticks must be driven by the host.
    pub fn new(source: TimerId, interval: Duration, sink: Option<TickSink>) -> Self {
        Self {
            source,
            interval: interval.max(Duration::from_millis(1)),
            generation: 0,
            active: false,
            sink,
            task: None,
        }
    }

    /// Create a host-driven scheduler.
    pub fn manual(source: TimerId, interval: Duration) -> Self {
        Self::new(source, interval, None)
    }

    pub fn source(&self) -> TimerId {
        self.source
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Generation of the current (or most recent) run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the scheduler is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin producing ticks. No-op while already active.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.generation = self.generation.wrapping_add(1);

        if let Some(sink) = &self.sink {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    self.task = Some(handle.spawn(tick_loop(
                        self.source,
                        self.generation,
                        self.interval,
                        sink.clone(),
                    )));
                }
                Err(_) => {
                    warn!(timer = %self.source, "no tokio runtime, ticks must be driven by the host");
                }
            }
        }

        debug!(timer = %self.source, generation = self.generation, "scheduler started");
    }

    /// Stop producing ticks. Idempotent.
    ///
    /// Ticks from this run that are still queued in the channel are rejected
    /// by [`accepts`](Self::accepts) from here on.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!(timer = %self.source, generation = self.generation, "scheduler stopped");
    }

    /// Whether a tick belongs to the current, still-active run.
    pub fn accepts(&self, tick: &Tick) -> bool {
        self.active && tick.source == self.source && tick.generation == self.generation
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick_loop(source: TimerId, generation: u64, period: Duration, sink: TickSink) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if sink.send(Tick { source, generation }).is_err() {
            break;
        }
    }
}
