//! The set of productivity tools and the container that owns them.

use crate::analytics::{Analytics, AnalyticsEvent};
use crate::countdown::CountdownTimer;
use crate::config::Config;
use crate::focus::FocusMode;
use crate::pomodoro::PomodoroTimer;
use crate::scheduler::{Tick, TickSink, TimerId};
use crate::stopwatch::Stopwatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A selectable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pomodoro,
    Stopwatch,
    Countdown,
    Focus,
}

impl ToolKind {
    /// All tools in tab order.
    pub const ALL: [Self; 4] = [Self::Pomodoro, Self::Stopwatch, Self::Countdown, Self::Focus];

    pub fn id(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::Stopwatch => "stopwatch",
            Self::Countdown => "countdown",
            Self::Focus => "focus",
        }
    }

    /// Tab title.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::Stopwatch => "Stopwatch",
            Self::Countdown => "Timer",
            Self::Focus => "Focus",
        }
    }

    /// Position in tab order.
    pub fn index(self) -> usize {
        match self {
            Self::Pomodoro => 0,
            Self::Stopwatch => 1,
            Self::Countdown => 2,
            Self::Focus => 3,
        }
    }

    /// Tool at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Owns one instance of every tool.
///
/// Timers keep running while another tool is selected. Dropping the toolbox
/// stops every scheduler.
#[derive(Debug)]
pub struct Toolbox {
    selected: ToolKind,
    pub pomodoro: PomodoroTimer,
    pub stopwatch: Stopwatch,
    pub countdown: CountdownTimer,
    pub focus: FocusMode,
    analytics: Analytics,
}

impl Toolbox {
    pub fn new(config: &Config, analytics: Analytics, sink: Option<TickSink>) -> Self {
        Self {
            selected: ToolKind::default(),
            pomodoro: PomodoroTimer::new(&config.pomodoro, sink.clone(), analytics.clone()),
            stopwatch: Stopwatch::new(sink.clone(), analytics.clone()),
            countdown: CountdownTimer::new(config.countdown, sink, analytics.clone()),
            focus: FocusMode::new(config.focus.volume, analytics.clone()),
            analytics,
        }
    }

    /// A host-driven toolbox with analytics disabled.
    pub fn manual(config: &Config) -> Self {
        Self::new(config, Analytics::disabled(), None)
    }

    pub fn selected(&self) -> ToolKind {
        self.selected
    }

    /// Switch the visible tool.
    pub fn select(&mut self, kind: ToolKind) {
        self.selected = kind;
        debug!(tool = %kind, "tool selected");
        self.analytics
            .emit(AnalyticsEvent::ProductivityToolSelect { tool_name: kind });
    }

    /// Route a scheduled tick to the timer that produced it.
    pub fn handle_tick(&mut self, tick: &Tick) -> bool {
        match tick.source {
            TimerId::Pomodoro => self.pomodoro.handle_tick(tick),
            TimerId::Stopwatch => self.stopwatch.handle_tick(tick),
            TimerId::Countdown => self.countdown.handle_tick(tick),
        }
    }

    /// Whether any timer is currently running.
    pub fn any_running(&self) -> bool {
        self.pomodoro.is_running() || self.stopwatch.is_running() || self.countdown.is_running()
    }

    /// Stop every scheduler and leave focus mode.
    pub fn teardown(&mut self) {
        self.pomodoro.stop();
        self.stopwatch.stop();
        self.countdown.stop();
        self.focus.deactivate();
        debug!("toolbox torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::CountdownStatus;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_tool_order() {
        assert_eq!(ToolKind::Pomodoro.next(), ToolKind::Stopwatch);
        assert_eq!(ToolKind::Focus.next(), ToolKind::Pomodoro);
        assert_eq!(ToolKind::Pomodoro.prev(), ToolKind::Focus);
        assert_eq!(ToolKind::from_index(2), Some(ToolKind::Countdown));
        assert_eq!(ToolKind::from_index(4), None);
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_index(kind.index()), Some(kind));
        }
    }

    #[test]
    fn test_select_emits_event() {
        let (analytics, mut rx) = Analytics::channel();
        let mut toolbox = Toolbox::new(&Config::default(), analytics, None);
        toolbox.select(ToolKind::Countdown);
        assert_eq!(toolbox.selected(), ToolKind::Countdown);
        assert_eq!(
            rx.try_recv().unwrap().event,
            AnalyticsEvent::ProductivityToolSelect {
                tool_name: ToolKind::Countdown
            }
        );
    }

    #[test]
    fn test_timers_run_independently() {
        let mut toolbox = Toolbox::manual(&Config::default());
        toolbox.stopwatch.toggle();
        toolbox.countdown.toggle();
        toolbox.select(ToolKind::Focus);

        toolbox.stopwatch.tick();
        toolbox.countdown.tick();
        assert_eq!(toolbox.stopwatch.elapsed_ms(), 10);
        assert_eq!(toolbox.countdown.remaining(), 299);
        assert!(!toolbox.pomodoro.is_running());
        assert!(toolbox.any_running());
    }

    #[test]
    fn test_handle_tick_routes_by_source() {
        let mut toolbox = Toolbox::manual(&Config::default());
        toolbox.pomodoro.toggle();
        let tick = Tick {
            source: TimerId::Pomodoro,
            generation: 1,
        };
        assert!(toolbox.handle_tick(&tick));
        assert_eq!(toolbox.pomodoro.remaining(), 1_499);

        let stray = Tick {
            source: TimerId::Stopwatch,
            generation: 1,
        };
        assert!(!toolbox.handle_tick(&stray));
        assert_eq!(toolbox.stopwatch.elapsed_ms(), 0);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut toolbox = Toolbox::manual(&Config::default());
        toolbox.pomodoro.toggle();
        toolbox.stopwatch.toggle();
        toolbox.countdown.toggle();
        toolbox.focus.toggle();

        toolbox.teardown();
        assert!(!toolbox.any_running());
        assert!(!toolbox.focus.is_active());
        assert_eq!(toolbox.countdown.status(), CountdownStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_ticks_drive_countdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        config.countdown = crate::countdown::CountdownDuration::new(0, 0, 3);
        let mut toolbox = Toolbox::new(&config, Analytics::disabled(), Some(tx));
        toolbox.countdown.start();

        while !toolbox.countdown.is_finished() {
            let tick = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            toolbox.handle_tick(&tick);
        }
        assert_eq!(toolbox.countdown.remaining(), 0);
        assert!(!toolbox.countdown.is_running());
    }
}
