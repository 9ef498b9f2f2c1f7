//! Stopwatch screen - elapsed time and laps.

use crate::app::App;
use crate::screens::{tool_block, Screen};
use crate::ui::theme::{Styles, Symbols};
use crate::ui::widgets::KeyHint;
use focuskit_engine::format_stopwatch;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// The Stopwatch screen.
pub struct StopwatchScreen;

impl Screen for StopwatchScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let stopwatch = &app.toolbox.stopwatch;
        let block = tool_block("Stopwatch");
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(3)])
            .split(inner);

        let (marker, state, state_style) = if stopwatch.is_running() {
            (Symbols::RUNNING, "Running", Styles::running())
        } else if stopwatch.elapsed_ms() > 0 {
            (Symbols::PAUSED, "Paused", Styles::paused())
        } else {
            (Symbols::PAUSED, "Ready", Styles::dim())
        };

        let lines = vec![
            Line::default(),
            Line::from(Span::styled(stopwatch.display(), Styles::time())),
            Line::default(),
            Line::from(Span::styled(format!("{marker} {state}"), state_style)),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        render_laps(app, chunks[1], buf);
    }

    fn hints(&self, app: &App) -> Vec<KeyHint> {
        let stopwatch = &app.toolbox.stopwatch;
        let mut hints = vec![KeyHint::new(
            "Space",
            if stopwatch.is_running() { "Pause" } else { "Start" },
        )];
        if stopwatch.is_running() {
            hints.push(KeyHint::new("l", "Lap"));
        }
        hints.push(KeyHint::new("r", "Reset"));
        hints
    }

    fn status(&self, app: &App) -> &'static str {
        if app.toolbox.stopwatch.is_running() {
            "Running"
        } else {
            "Stopped"
        }
    }
}

/// Laps newest-first: delta on the first line, cumulative time beneath.
fn render_laps(app: &App, area: Rect, buf: &mut Buffer) {
    let laps = app.toolbox.stopwatch.laps();
    let block = Block::default()
        .title(format!(" Laps ({}) ", laps.len()))
        .title_style(Styles::title())
        .borders(Borders::TOP)
        .border_style(Styles::border())
        .style(Styles::default());

    let lines: Vec<Line> = if laps.is_empty() {
        vec![Line::from(Span::styled(
            "Press l while running to record a lap",
            Styles::dim(),
        ))]
    } else {
        laps.iter()
            .rev()
            .flat_map(|lap| {
                [
                    Line::from(vec![
                        Span::styled(format!("Lap {:<4}", lap.number), Styles::highlight()),
                        Span::styled(format_stopwatch(lap.delta_ms), Styles::default()),
                    ]),
                    Line::from(Span::styled(
                        format!("        {}", format_stopwatch(lap.cumulative_ms)),
                        Styles::dim(),
                    )),
                ]
            })
            .collect()
    };

    Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .render(area, buf);
}
