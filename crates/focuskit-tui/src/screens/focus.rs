//! Focus screen - ambient sound picker and the distraction-free view.

use crate::app::App;
use crate::screens::{tool_block, Screen};
use crate::ui::theme::{progress_bar, Styles, Symbols};
use crate::ui::widgets::KeyHint;
use focuskit_engine::AmbientSound;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Width of the volume bar, brackets excluded.
const VOLUME_WIDTH: usize = 20;

/// The Focus screen (inactive state).
pub struct FocusScreen;

impl Screen for FocusScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let focus = &app.toolbox.focus;
        let block = tool_block("Focus Mode");
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled("Focus Mode Inactive", Styles::dim())),
            Line::default(),
            Line::from(Span::styled("[ Start Focus ]", Styles::highlight())),
            Line::default(),
            Line::from(Span::styled("Ambient Sounds", Styles::title())),
        ];
        lines.extend(sound_lines(focus.sound()));
        lines.push(Line::default());
        lines.push(volume_line(focus.volume()));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }

    fn hints(&self, _app: &App) -> Vec<KeyHint> {
        vec![
            KeyHint::new("Space", "Start Focus"),
            KeyHint::new("n", "Sound"),
            KeyHint::new("Up/Down", "Volume"),
        ]
    }

    fn status(&self, _app: &App) -> &'static str {
        "Inactive"
    }
}

fn sound_lines(selected: AmbientSound) -> Vec<Line<'static>> {
    AmbientSound::ALL
        .iter()
        .map(|&sound| {
            if sound == selected {
                Line::from(Span::styled(
                    format!("{} {:<12}", Symbols::SELECTED, sound.name()),
                    Styles::highlight(),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {:<12}", sound.name()),
                    Styles::default(),
                ))
            }
        })
        .collect()
}

fn volume_line(volume: u8) -> Line<'static> {
    Line::from(vec![
        Span::styled("Volume ", Styles::dim()),
        Span::styled(
            progress_bar(f64::from(volume), VOLUME_WIDTH),
            Styles::active(),
        ),
    ])
}

/// Full-screen view shown while focus mode is active.
pub fn render_focus_view(app: &App, area: Rect, buf: &mut Buffer) {
    let focus = &app.toolbox.focus;
    Block::default().style(Styles::default()).render(area, buf);

    let top = area.height.saturating_sub(8) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::default()).collect();
    lines.extend([
        Line::from(Span::styled("Focus Mode Active", Styles::highlight())),
        Line::default(),
        Line::from(Span::styled(app.clock.time_text(), Styles::time())),
        Line::default(),
        Line::from(Span::styled(
            format!("Ambient: {}", focus.sound().name()),
            Styles::default(),
        )),
        volume_line(focus.volume()),
        Line::default(),
        Line::from(Span::styled(
            "Press Esc to return to normal mode",
            Styles::dim(),
        )),
    ]);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}
