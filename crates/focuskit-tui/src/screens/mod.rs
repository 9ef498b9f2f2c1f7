//! Screen definitions for the focuskit TUI.

pub mod countdown;
pub mod focus;
pub mod pomodoro;
pub mod stopwatch;

use crate::app::App;
use crate::ui::theme::Styles;
use crate::ui::widgets::{KeyHint, StatusBar, TabItem, Tabs};
use crate::ui::{centered_fixed, dashboard_layout, main_layout};
use focuskit_engine::ToolKind;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the tool body to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);

    /// Key hints for the status bar.
    fn hints(&self, app: &App) -> Vec<KeyHint>;

    /// Short state text shown at the right of the status bar.
    fn status(&self, app: &App) -> &'static str;
}

fn screen_for(kind: ToolKind) -> &'static dyn Screen {
    match kind {
        ToolKind::Pomodoro => &pomodoro::PomodoroScreen,
        ToolKind::Stopwatch => &stopwatch::StopwatchScreen,
        ToolKind::Countdown => &countdown::CountdownScreen,
        ToolKind::Focus => &focus::FocusScreen,
    }
}

/// Render the whole application: header, tabs, current tool and status bar.
pub fn render_app(app: &App, area: Rect, buf: &mut Buffer) {
    if app.in_focus_view() {
        let (main_area, status_area) = main_layout(area);
        focus::render_focus_view(app, main_area, buf);
        StatusBar::new("FOCUS")
            .hints(vec![
                KeyHint::new("Esc", "Exit Focus"),
                KeyHint::new("n", "Sound"),
                KeyHint::new("Up/Down", "Volume"),
            ])
            .right(app.notification.as_deref().unwrap_or("Focus Mode Active"))
            .render(status_area, buf);
    } else {
        let layout = dashboard_layout(area);
        render_header(app, layout.header, buf);
        render_tabs(app, layout.tabs, buf);

        let screen = screen_for(app.screen());
        screen.render(app, layout.body, buf);

        let mode = app.screen().name().to_uppercase();
        let mut hints = screen.hints(app);
        hints.push(KeyHint::new("?", "Help"));
        StatusBar::new(&mode)
            .hints(hints)
            .right(
                app.notification
                    .as_deref()
                    .unwrap_or_else(|| screen.status(app)),
            )
            .render(layout.status, buf);
    }

    if app.show_help {
        render_help_overlay(area, buf);
    }
}

/// Render the live clock header.
fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Styles::border())
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);

    let lines = vec![
        Line::from(Span::styled(app.clock.time_text(), Styles::time())),
        Line::from(Span::styled(app.clock.date_text(), Styles::default())),
        Line::from(Span::styled(
            format!("Current time in {}", app.clock.location_text()),
            Styles::dim(),
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

fn render_tabs(app: &App, area: Rect, buf: &mut Buffer) {
    let toolbox = &app.toolbox;
    let items = ToolKind::ALL
        .iter()
        .map(|kind| TabItem {
            title: kind.name(),
            running: match kind {
                ToolKind::Pomodoro => toolbox.pomodoro.is_running(),
                ToolKind::Stopwatch => toolbox.stopwatch.is_running(),
                ToolKind::Countdown => toolbox.countdown.is_running(),
                ToolKind::Focus => false,
            },
        })
        .collect();
    Tabs::new(items)
        .select(app.screen().index())
        .render(area, buf);
}

/// Bordered block used around every tool body.
pub(crate) fn tool_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default())
}

/// Render the help overlay.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    let help_text = r"
  Tools
    1-4 / Tab         Switch tool
    Space / Enter     Start / pause
    r                 Reset
    l                 Lap (stopwatch)
    Left/Right        Pick field (timer)
    Up/Down           Adjust field / volume
    e                 Edit label (timer)
    n                 Next ambient sound
    Esc               Exit focus / back
    q                 Quit
    ?                 Toggle this help

  [Press any key to close]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 18.min(area.height.saturating_sub(4));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
