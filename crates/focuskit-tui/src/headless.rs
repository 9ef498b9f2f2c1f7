//! Headless mode for the focuskit TUI.
//!
//! Runs the TUI without a real terminal, for E2E testing and automation.
//! Actions are sent via a channel and the rendered screen is published
//! after every draw. Frames are drawn on actions and UI ticks only, so
//! timer ticks never force a redraw.

use crate::app::App;
use crate::event::Action;
use crate::screens;
use focuskit_engine::{Analytics, Config, ToolKind};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Screen size used when none is given.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// Snapshot published after every frame.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    pub tool: ToolKind,
    /// Rendered frame as text, see [`buffer_to_string`].
    pub screen_contents: String,
    pub should_quit: bool,
    pub show_help: bool,
    pub focus_active: bool,
    /// Frames drawn so far.
    pub frames: u64,
}

/// Drives a headless TUI: feed it actions, observe its frames.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Queue an action. `false` once the loop has exited.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Latest published frame.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait for a frame matching `condition`, giving up after `timeout`.
    ///
    /// Also gives up when the loop exits without producing a match.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        match tokio::time::timeout(timeout, self.state_rx.wait_for(|s| condition(s))).await {
            Ok(Ok(state)) => Some(state.clone()),
            Ok(Err(_)) | Err(_) => None,
        }
    }

    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    pub async fn wait_for_tool(
        &mut self,
        tool: ToolKind,
        timeout: Duration,
    ) -> Option<HeadlessState> {
        self.wait_for(|s| s.tool == tool, timeout).await
    }

    pub fn has_quit(&self) -> bool {
        self.state_rx.borrow().should_quit
    }
}

/// Virtual terminal size and UI tick rate.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub tick_rate: Duration,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate: Duration::from_millis(50),
        }
    }
}

/// Spawn the app on a `TestBackend`. Timers tick on real schedulers.
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(Config::default(), HeadlessConfig::default());
/// handle.send_action(Action::Tab(2));
/// handle.wait_for_text("Set Timer", Duration::from_secs(1)).await;
/// handle.send_action(Action::Quit);
/// ```
pub fn run_tui_headless(
    config: Config,
    headless: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(&config, &headless, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    config: &Config,
    headless: &HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(headless.width, headless.height);
    let mut terminal = Terminal::new(backend)?;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, Analytics::disabled(), Some(tick_tx));

    // Held across iterations so timer ticks cannot starve it
    let mut ui_tick = tokio::time::interval(headless.tick_rate);
    ui_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ui_tick.tick().await;

    let mut frames = 0u64;
    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|frame| {
                let area = frame.area();
                screens::render_app(&app, area, frame.buffer_mut());
            })?;
            frames += 1;

            let _ = state_tx.send(HeadlessState {
                tool: app.screen(),
                screen_contents: buffer_to_string(terminal.backend().buffer()),
                should_quit: app.should_quit,
                show_help: app.show_help,
                focus_active: app.in_focus_view(),
                frames,
            });
        }

        if app.should_quit {
            break;
        }

        redraw = tokio::select! {
            Some(action) = action_rx.recv() => {
                app.handle_action(action);
                true
            }
            Some(tick) = tick_rx.recv() => {
                app.on_timer_tick(&tick);
                false
            }
            _ = ui_tick.tick() => {
                app.tick();
                true
            }
        };
    }

    Ok(())
}

/// Text of a buffer: one line per row, trailing blanks dropped.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)))
                .map(|cell| cell.symbol())
                .collect();
            row.trim_end_matches(' ').to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use focuskit_engine::CountdownDuration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_buffer_to_string_trims_rows() {
        use ratatui::layout::Rect;
        use ratatui::style::Style;

        let mut buffer = Buffer::empty(Rect::new(2, 1, 8, 3));
        buffer.set_string(2, 1, "25:00", Style::default());
        buffer.set_string(4, 3, "go", Style::default());

        assert_eq!(buffer_to_string(&buffer), "25:00\n\n  go");
    }

    #[tokio::test]
    async fn test_wait_for_times_out() {
        let (mut handle, task) = run_tui_headless(Config::default(), HeadlessConfig::default());
        let state = handle
            .wait_for_text("no such text", Duration::from_millis(200))
            .await;
        assert!(state.is_none());

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
        assert!(!handle.send_action(Action::Help));
    }

    #[tokio::test]
    async fn test_headless_navigation_and_quit() {
        let (mut handle, task) = run_tui_headless(Config::default(), HeadlessConfig::default());
        assert!(handle.wait_for_text("Pomodoro Timer", WAIT).await.is_some());

        handle.send_action(Action::Tab(1));
        let state = handle.wait_for_tool(ToolKind::Stopwatch, WAIT).await.unwrap();
        assert!(state.screen_contents.contains("00:00.00"));

        handle.send_action(Action::Help);
        assert!(handle.wait_for(|s| s.show_help, WAIT).await.is_some());
        handle.send_action(Action::Back);
        assert!(handle.wait_for(|s| !s.show_help, WAIT).await.is_some());

        handle.send_action(Action::Quit);
        assert!(handle.wait_for(|s| s.should_quit, WAIT).await.is_some());
        task.await.unwrap().unwrap();
        assert!(handle.has_quit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_headless_countdown_finishes() {
        let mut config = Config::default();
        config.countdown = CountdownDuration::new(0, 0, 3);
        let (mut handle, task) = run_tui_headless(config, HeadlessConfig::default());

        handle.send_action(Action::Tab(2));
        handle.wait_for_text("Set Timer", WAIT).await.unwrap();
        handle.send_action(Action::Toggle);

        let state = handle.wait_for_text("Time's up!", WAIT).await.unwrap();
        assert!(state.screen_contents.contains("00:00"));

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_while_stopwatch_runs() {
        let mut config = Config::default();
        config.countdown = CountdownDuration::new(0, 0, 0);
        let (mut handle, task) = run_tui_headless(config, HeadlessConfig::default());

        handle.send_action(Action::Tab(1));
        handle.wait_for_tool(ToolKind::Stopwatch, WAIT).await.unwrap();
        handle.send_action(Action::Toggle);
        handle.send_action(Action::Tab(2));
        handle.send_action(Action::Toggle);
        handle
            .wait_for_text("Set a duration first", WAIT)
            .await
            .unwrap();

        let state = handle
            .wait_for(|s| !s.screen_contents.contains("Set a duration first"), WAIT)
            .await
            .unwrap();
        assert!(state.screen_contents.contains("[2] Stopwatch >"));

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_ticks_do_not_redraw() {
        let (mut handle, task) = run_tui_headless(Config::default(), HeadlessConfig::default());

        handle.send_action(Action::Tab(1));
        handle.wait_for_tool(ToolKind::Stopwatch, WAIT).await.unwrap();
        handle.send_action(Action::Toggle);
        let before = handle
            .wait_for_text("[2] Stopwatch >", WAIT)
            .await
            .unwrap()
            .frames;

        // 100 stopwatch ticks, 20 UI ticks
        tokio::time::sleep(Duration::from_secs(1)).await;
        let drawn = handle.state().frames - before;
        assert!(drawn >= 15, "UI ticks should keep redrawing, got {drawn}");
        assert!(drawn <= 25, "timer ticks should not redraw, got {drawn}");

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_headless_focus_view() {
        let (mut handle, task) = run_tui_headless(Config::default(), HeadlessConfig::default());

        handle.send_action(Action::Tab(3));
        handle.wait_for_text("Focus Mode Inactive", WAIT).await.unwrap();
        handle.send_action(Action::Toggle);
        let state = handle
            .wait_for_text("Focus Mode Active", WAIT)
            .await
            .unwrap();
        assert!(state.focus_active);
        assert!(!state.screen_contents.contains("[1] Pomodoro"));

        handle.send_action(Action::Back);
        assert!(handle.wait_for(|s| !s.focus_active, WAIT).await.is_some());

        handle.send_action(Action::Quit);
        task.await.unwrap().unwrap();
    }
}
