//! Countdown screen - duration setup, running timer and the finished banner.

use crate::app::App;
use crate::screens::{tool_block, Screen};
use crate::ui::theme::{progress_bar, Styles, Symbols};
use crate::ui::widgets::{KeyHint, LabelInput};
use focuskit_engine::{CountdownStatus, DurationField};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Width of the progress bar, brackets excluded.
const BAR_WIDTH: usize = 30;

/// The Countdown screen.
pub struct CountdownScreen;

impl Screen for CountdownScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let block = tool_block("Countdown Timer");
        let inner = block.inner(area);
        block.render(area, buf);

        match app.toolbox.countdown.status() {
            CountdownStatus::Setup => render_setup(app, inner, buf),
            CountdownStatus::Running | CountdownStatus::Paused => render_running(app, inner, buf),
            CountdownStatus::Finished => render_finished(app, inner, buf),
        }
    }

    fn hints(&self, app: &App) -> Vec<KeyHint> {
        if app.label_input.is_some() {
            return vec![KeyHint::new("Enter", "Save"), KeyHint::new("Esc", "Cancel")];
        }
        match app.toolbox.countdown.status() {
            CountdownStatus::Setup => vec![
                KeyHint::new("Space", "Start"),
                KeyHint::new("Left/Right", "Field"),
                KeyHint::new("Up/Down", "Adjust"),
                KeyHint::new("e", "Label"),
            ],
            CountdownStatus::Running => {
                vec![KeyHint::new("Space", "Pause"), KeyHint::new("r", "Reset")]
            }
            CountdownStatus::Paused => {
                vec![KeyHint::new("Space", "Resume"), KeyHint::new("r", "Reset")]
            }
            CountdownStatus::Finished => vec![KeyHint::new("r", "Reset")],
        }
    }

    fn status(&self, app: &App) -> &'static str {
        match app.toolbox.countdown.status() {
            CountdownStatus::Setup => "Setup",
            CountdownStatus::Running => "Running",
            CountdownStatus::Paused => "Paused",
            CountdownStatus::Finished => "Finished",
        }
    }
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let countdown = &app.toolbox.countdown;
    let duration = countdown.duration();

    let mut fields = Vec::new();
    for (i, field) in [DurationField::Hours, DurationField::Minutes, DurationField::Seconds]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            fields.push(Span::styled(" : ", Styles::dim()));
        }
        let selected = field == app.countdown_field;
        let text = if selected {
            format!("[{:02}]", duration.get(field))
        } else {
            format!(" {:02} ", duration.get(field))
        };
        fields.push(Span::styled(
            text,
            if selected {
                Styles::highlight()
            } else {
                Styles::time()
            },
        ));
    }

    let labels = Line::from(Span::styled(
        format!(
            " {:^4}   {:^4}   {:^4} ",
            DurationField::Hours.label(),
            DurationField::Minutes.label(),
            DurationField::Seconds.label()
        ),
        Styles::dim(),
    ));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let lines = vec![
        Line::default(),
        Line::from(Span::styled("Set Timer", Styles::highlight())),
        Line::default(),
        Line::from(fields),
        labels,
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let label_area = centered_row(chunks[1], 44);
    if let Some(input) = &app.label_input {
        LabelInput::new(input)
            .placeholder("Add a label (optional)")
            .render(label_area, buf);
    } else if countdown.label().is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "Press e to add a label",
            Styles::dim(),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    } else {
        Paragraph::new(Line::from(Span::styled(
            format!("Label: {}", countdown.label()),
            Styles::default(),
        )))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    }
}

fn render_running(app: &App, area: Rect, buf: &mut Buffer) {
    let countdown = &app.toolbox.countdown;
    let (marker, state, state_style) = if countdown.is_running() {
        (Symbols::RUNNING, "Running", Styles::running())
    } else {
        (Symbols::PAUSED, "Paused", Styles::paused())
    };

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(countdown.display(), Styles::time())),
    ];
    if !countdown.label().is_empty() {
        lines.push(Line::from(Span::styled(countdown.label(), Styles::dim())));
    }
    lines.extend([
        Line::default(),
        Line::from(Span::styled(
            progress_bar(countdown.progress(), BAR_WIDTH),
            Styles::highlight(),
        )),
        Line::default(),
        Line::from(Span::styled(format!("{marker} {state}"), state_style)),
    ]);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let countdown = &app.toolbox.countdown;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled("Time's up!", Styles::alert())),
    ];
    if !countdown.label().is_empty() {
        lines.push(Line::from(Span::styled(countdown.label(), Styles::alert())));
    }
    lines.extend([
        Line::default(),
        Line::from(Span::styled(countdown.display(), Styles::time())),
        Line::default(),
        Line::from(Span::styled("Press r to set a new timer", Styles::dim())),
    ]);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// A one-line row of at most `width` columns centered in `area`.
fn centered_row(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height.min(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_test_app_at, render_screen_to_string};
    use focuskit_engine::ToolKind;

    #[test]
    fn test_render_setup() {
        let app = create_test_app_at(ToolKind::Countdown);
        let result = render_screen_to_string(&CountdownScreen, &app);
        assert!(result.contains("Set Timer"));
        assert!(result.contains(" 00  : [05] :  00"));
        assert!(result.contains("Press e to add a label"));
    }

    #[test]
    fn test_render_label_editor() {
        let mut app = create_test_app_at(ToolKind::Countdown);
        app.handle_action(Action::EditLabel);
        let result = render_screen_to_string(&CountdownScreen, &app);
        assert!(result.contains("> _Add a label (optional)"));
    }

    #[test]
    fn test_render_running_with_label() {
        let mut app = create_test_app_at(ToolKind::Countdown);
        app.toolbox.countdown.set_label("Tea");
        app.handle_action(Action::Toggle);
        app.toolbox.countdown.tick();

        let result = render_screen_to_string(&CountdownScreen, &app);
        assert!(result.contains("04:59"));
        assert!(result.contains("Tea"));
        assert!(result.contains("> Running"));
        assert_eq!(CountdownScreen.status(&app), "Running");
    }

    #[test]
    fn test_render_finished() {
        let mut app = create_test_app_at(ToolKind::Countdown);
        app.toolbox.countdown.set_duration(0, 0, 2);
        app.handle_action(Action::Toggle);
        app.toolbox.countdown.tick();
        app.toolbox.countdown.tick();

        let result = render_screen_to_string(&CountdownScreen, &app);
        assert!(result.contains("Time's up!"));
        assert!(result.contains("00:00"));
        assert_eq!(CountdownScreen.hints(&app).len(), 1);
    }
}
