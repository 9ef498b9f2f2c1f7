//! Test utilities for focuskit-tui rendering tests.

use crate::app::App;
use crate::headless::buffer_to_string;
use crate::screens::{self, Screen};
use focuskit_engine::ToolKind;
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(TEST_WIDTH, TEST_HEIGHT);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app with manual timers and a fixed clock.
pub fn create_test_app() -> App {
    App::new_for_test()
}

/// Create a test app with a specific tool selected.
pub fn create_test_app_at(tool: ToolKind) -> App {
    let mut app = App::new_for_test();
    app.toolbox.select(tool);
    app
}

/// Render a single screen into an 80x24 buffer and return it as text.
pub fn render_screen_to_string<S: Screen>(screen: &S, app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Render the whole application into a buffer of the given size.
pub fn render_app_to_string(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screens::render_app(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app_at() {
        let app = create_test_app_at(ToolKind::Countdown);
        assert_eq!(app.screen(), ToolKind::Countdown);
        assert!(!app.toolbox.any_running());
    }

    #[test]
    fn test_render_app_to_string_dimensions() {
        let app = create_test_app();
        let result = render_app_to_string(&app, 60, 20);
        assert_eq!(result.lines().count(), 20);
    }
}
