//! Application state and update logic for the focuskit TUI.

use crate::event::{key_to_action, Action};
use crate::ui::widgets::LabelInputState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use focuskit_engine::{
    Analytics, Config, CountdownStatus, DurationField, LiveClock, Phase, Tick, TickSink,
    ToolKind, Toolbox,
};
use tracing::debug;

/// Volume change per Up/Down press, in percent.
pub const VOLUME_STEP: i16 = 5;

/// UI ticks a regular notification stays visible.
const NOTIFICATION_TTL: usize = 12;

/// UI ticks a timer alert stays visible.
const ALERT_TTL: usize = 40;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// All productivity tools.
    pub toolbox: Toolbox,

    /// Header clock.
    pub clock: LiveClock,

    /// Countdown field adjusted by Up/Down during setup.
    pub countdown_field: DurationField,

    /// Label being edited, if any.
    pub label_input: Option<LabelInputState>,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,
}

impl App {
    /// Create a new app instance.
    ///
    /// With a sink, timers deliver scheduled ticks into it and the caller
    /// routes them back through [`App::on_timer_tick`].
    pub fn new(config: &Config, analytics: Analytics, sink: Option<TickSink>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            toolbox: Toolbox::new(config, analytics, sink),
            clock: LiveClock::now(),
            countdown_field: DurationField::default(),
            label_input: None,
            tick: 0,
            notification: None,
            notification_ttl: 0,
        }
    }

    /// Create an app with host-driven timers and a fixed clock.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 1, 6)
            .and_then(|d| d.and_hms_opt(21, 5, 3))
            .unwrap_or_default();
        Self {
            clock: LiveClock::at(now, Some("America/New_York".into())),
            ..Self::new(&Config::default(), Analytics::disabled(), None)
        }
    }

    /// The tool currently shown.
    pub fn screen(&self) -> ToolKind {
        self.toolbox.selected()
    }

    /// Whether the distraction-free focus view is showing.
    pub fn in_focus_view(&self) -> bool {
        self.toolbox.focus.is_active()
    }

    /// Handle a key, routing it to the label editor while one is open.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.label_input.is_some() && self.handle_label_key(key) {
            return;
        }
        self.handle_action(key_to_action(key));
    }

    /// Handle an action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.quit();
                }
                return;
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return;
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return;
        }

        match action {
            Action::Back => self.back(),
            Action::NextTab => self.select(self.screen().next()),
            Action::PrevTab => self.select(self.screen().prev()),
            Action::Tab(index) => {
                if let Some(kind) = ToolKind::from_index(index) {
                    self.select(kind);
                }
            }
            _ => match self.screen() {
                ToolKind::Pomodoro => self.handle_pomodoro_action(action),
                ToolKind::Stopwatch => self.handle_stopwatch_action(action),
                ToolKind::Countdown => self.handle_countdown_action(action),
                ToolKind::Focus => self.handle_focus_action(action),
            },
        }
    }

    fn select(&mut self, kind: ToolKind) {
        // Tabs are hidden in the focus view
        if self.in_focus_view() {
            return;
        }
        self.label_input = None;
        self.toolbox.select(kind);
    }

    fn back(&mut self) {
        if self.in_focus_view() {
            self.toolbox.focus.deactivate();
        } else if self.screen() != ToolKind::default() {
            self.select(ToolKind::default());
        }
    }

    /// Stop all timers and request exit.
    pub fn quit(&mut self) {
        self.toolbox.teardown();
        self.should_quit = true;
    }

    fn handle_pomodoro_action(&mut self, action: Action) {
        let pomodoro = &mut self.toolbox.pomodoro;
        match action {
            Action::Toggle => pomodoro.toggle(),
            Action::Reset => pomodoro.reset(),
            _ => {}
        }
    }

    fn handle_stopwatch_action(&mut self, action: Action) {
        let stopwatch = &mut self.toolbox.stopwatch;
        match action {
            Action::Toggle => stopwatch.toggle(),
            Action::Reset => stopwatch.reset(),
            Action::Lap => {
                stopwatch.lap();
            }
            _ => {}
        }
    }

    fn handle_countdown_action(&mut self, action: Action) {
        let countdown = &mut self.toolbox.countdown;
        match action {
            Action::Toggle => {
                countdown.toggle();
                if countdown.status() == CountdownStatus::Setup {
                    self.set_notification("Set a duration first".to_string(), NOTIFICATION_TTL);
                }
            }
            Action::Reset => countdown.reset(),
            Action::Left => self.countdown_field = self.countdown_field.prev(),
            Action::Right => self.countdown_field = self.countdown_field.next(),
            Action::Up => countdown.adjust(self.countdown_field, true),
            Action::Down => countdown.adjust(self.countdown_field, false),
            Action::EditLabel => {
                if countdown.status() == CountdownStatus::Setup {
                    self.label_input = Some(LabelInputState::with_content(countdown.label()));
                }
            }
            _ => {}
        }
    }

    fn handle_focus_action(&mut self, action: Action) {
        let focus = &mut self.toolbox.focus;
        match action {
            Action::Toggle => focus.toggle(),
            Action::CycleSound | Action::Right => focus.cycle_sound(),
            Action::Up => focus.adjust_volume(VOLUME_STEP),
            Action::Down => focus.adjust_volume(-VOLUME_STEP),
            _ => {}
        }
    }

    /// Handle a key while the label editor is open.
    ///
    /// Returns `true` if the key was consumed.
    fn handle_label_key(&mut self, key: KeyEvent) -> bool {
        let Some(input) = self.label_input.as_mut() else {
            return false;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match key.code {
            KeyCode::Enter => {
                let label = input.take();
                self.toolbox.countdown.set_label(label);
                self.label_input = None;
            }
            KeyCode::Esc => self.label_input = None,
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => return false,
        }
        true
    }

    /// Apply a scheduled timer tick and surface completions.
    pub fn on_timer_tick(&mut self, tick: &Tick) {
        let was_finished = self.toolbox.countdown.is_finished();
        let phase = self.toolbox.pomodoro.phase();

        if !self.toolbox.handle_tick(tick) {
            debug!(source = %tick.source, generation = tick.generation, "stale tick dropped");
            return;
        }

        if !was_finished && self.toolbox.countdown.is_finished() {
            let label = self.toolbox.countdown.label();
            let msg = if label.is_empty() {
                "Time's up!".to_string()
            } else {
                format!("Time's up! {label}")
            };
            self.set_notification(msg, ALERT_TTL);
        }

        let pomodoro = &self.toolbox.pomodoro;
        if pomodoro.phase() != phase {
            let msg = match pomodoro.phase() {
                Phase::Break => format!(
                    "Session {} complete, take a break",
                    pomodoro.completed_sessions()
                ),
                Phase::Work => "Break over, back to work".to_string(),
            };
            self.set_notification(msg, ALERT_TTL);
        }
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String, ttl: usize) {
        self.notification = Some(msg);
        self.notification_ttl = ttl;
    }

    /// Update on each UI tick.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.clock.refresh();

        // Clear notification after TTL expires
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focuskit_engine::TimerId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_app_defaults() {
        let app = App::new_for_test();
        assert_eq!(app.screen(), ToolKind::Pomodoro);
        assert!(!app.should_quit);
        assert!(!app.show_help);
        assert!(app.label_input.is_none());
    }

    #[test]
    fn test_countdown_field_navigation_and_adjust() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(2));
        assert_eq!(app.countdown_field, DurationField::Minutes);

        app.handle_action(Action::Up);
        assert_eq!(app.toolbox.countdown.duration().minutes, 6);

        app.handle_action(Action::Left);
        app.handle_action(Action::Down);
        assert_eq!(app.countdown_field, DurationField::Hours);
        assert_eq!(app.toolbox.countdown.duration().hours, 0);
    }

    #[test]
    fn test_label_editing() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(2));
        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.label_input.is_some());

        // 'q' and 'r' are text while editing
        for c in "qr tea".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(app.label_input.is_none());
        assert!(!app.should_quit);
        assert_eq!(app.toolbox.countdown.label(), "qr tea");
    }

    #[test]
    fn test_label_edit_cancel() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(2));
        app.handle_action(Action::EditLabel);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert!(app.label_input.is_none());
        assert_eq!(app.toolbox.countdown.label(), "");
        assert_eq!(app.screen(), ToolKind::Countdown);
    }

    #[test]
    fn test_label_locked_while_running() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(2));
        app.handle_action(Action::Toggle);
        app.handle_action(Action::EditLabel);
        assert!(app.label_input.is_none());
    }

    #[test]
    fn test_zero_countdown_notifies() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(2));
        for _ in 0..5 {
            app.handle_action(Action::Down);
        }
        app.handle_action(Action::Toggle);
        assert_eq!(app.toolbox.countdown.status(), CountdownStatus::Setup);
        assert!(app.notification.is_some());
    }

    #[test]
    fn test_focus_volume_and_sound() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(3));
        app.handle_action(Action::Up);
        assert_eq!(app.toolbox.focus.volume(), 35);
        app.handle_action(Action::CycleSound);
        assert_eq!(
            app.toolbox.focus.sound(),
            focuskit_engine::AmbientSound::Rain
        );
    }

    #[test]
    fn test_focus_view_blocks_tab_switch() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Tab(3));
        app.handle_action(Action::Toggle);
        assert!(app.in_focus_view());

        app.handle_action(Action::Tab(0));
        assert_eq!(app.screen(), ToolKind::Focus);

        app.handle_action(Action::Back);
        assert!(!app.in_focus_view());
        assert_eq!(app.screen(), ToolKind::Focus);
    }

    #[test]
    fn test_timer_tick_alerts() {
        let mut app = App::new_for_test();
        app.toolbox.countdown.set_duration(0, 0, 1);
        app.toolbox.countdown.start();
        let generation = 1;
        app.on_timer_tick(&Tick {
            source: TimerId::Countdown,
            generation,
        });
        assert!(app.toolbox.countdown.is_finished());
        assert_eq!(app.notification.as_deref(), Some("Time's up!"));
    }

    #[test]
    fn test_notification_expires() {
        let mut app = App::new_for_test();
        app.set_notification("hello".to_string(), 2);
        app.tick();
        assert!(app.notification.is_some());
        app.tick();
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_quit_tears_down_timers() {
        let mut app = App::new_for_test();
        app.handle_action(Action::Toggle);
        assert!(app.toolbox.pomodoro.is_running());
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        assert!(!app.toolbox.any_running());
    }
}
