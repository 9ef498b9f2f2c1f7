//! Pomodoro screen - work/break cycles with a progress bar.

use crate::app::App;
use crate::screens::{tool_block, Screen};
use crate::ui::theme::{progress_bar, Styles, Symbols};
use crate::ui::widgets::KeyHint;
use focuskit_engine::Phase;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Width of the progress bar, brackets excluded.
const BAR_WIDTH: usize = 30;

/// The Pomodoro screen.
pub struct PomodoroScreen;

impl Screen for PomodoroScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let pomodoro = &app.toolbox.pomodoro;
        let block = tool_block("Pomodoro Timer");
        let inner = block.inner(area);
        block.render(area, buf);

        let phase_style = match pomodoro.phase() {
            Phase::Work => Styles::highlight(),
            Phase::Break => Styles::break_phase(),
        };
        let (marker, state, state_style) = if pomodoro.is_running() {
            (Symbols::RUNNING, "Running", Styles::running())
        } else {
            (Symbols::PAUSED, "Paused", Styles::paused())
        };

        let lines = vec![
            Line::default(),
            Line::from(Span::styled(pomodoro.phase().label(), phase_style)),
            Line::default(),
            Line::from(Span::styled(pomodoro.display(), Styles::time())),
            Line::default(),
            Line::from(Span::styled(
                progress_bar(pomodoro.progress(), BAR_WIDTH),
                phase_style,
            )),
            Line::default(),
            Line::from(Span::styled(
                format!(
                    "Session {} • {} completed",
                    pomodoro.session_number(),
                    pomodoro.completed_sessions()
                ),
                Styles::dim(),
            )),
            Line::from(Span::styled(
                format!(
                    "{} min focus / {} min break",
                    pomodoro.work_minutes(),
                    pomodoro.break_minutes()
                ),
                Styles::dim(),
            )),
            Line::default(),
            Line::from(Span::styled(format!("{marker} {state}"), state_style)),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn hints(&self, app: &App) -> Vec<KeyHint> {
        let toggle = if app.toolbox.pomodoro.is_running() {
            "Pause"
        } else {
            "Start"
        };
        vec![KeyHint::new("Space", toggle), KeyHint::new("r", "Reset")]
    }

    fn status(&self, app: &App) -> &'static str {
        match (app.toolbox.pomodoro.phase(), app.toolbox.pomodoro.is_running()) {
            (Phase::Work, true) => "Focusing",
            (Phase::Break, true) => "On break",
            (_, false) => "Paused",
        }
    }
}
