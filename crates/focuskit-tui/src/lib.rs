//! focuskit-tui: Terminal UI for the focuskit productivity tools
//!
//! This crate provides the TUI layer for focuskit, including:
//! - Live clock header and tool tabs
//! - Pomodoro, stopwatch, countdown and focus mode screens
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod ui;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use focuskit_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use focuskit_engine::{Analytics, Config, Tick};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::sync::mpsc;
use tracing::info;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit. Analytics events from the tools are sent
/// through `analytics`.
pub async fn run_tui(config: &Config, analytics: Analytics) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut app = App::new(config, analytics, Some(tick_tx));
    let mut events = EventHandler::new(config.ui.tick_rate());

    info!(tick_rate_ms = config.ui.tick_rate_ms, "tui started");
    let result = run_loop(&mut terminal, &mut app, &mut events, &mut tick_rx).await;
    info!("tui stopped");

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    tick_rx: &mut mpsc::UnboundedReceiver<Tick>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Timer ticks only update state; the next UI tick draws their progress
    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|frame| {
                let area = frame.area();
                screens::render_app(app, area, frame.buffer_mut());
            })?;
        }

        redraw = tokio::select! {
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => app.handle_key(key),
                    Event::Tick => app.tick(),
                    // Next draw picks up the new size
                    Event::Resize(_, _) => {}
                }
                true
            }
            Some(tick) = tick_rx.recv() => {
                app.on_timer_tick(&tick);
                false
            }
            else => break,
        };

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
