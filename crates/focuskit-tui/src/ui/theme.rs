//! Theme and styling definitions for the focuskit TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(130, 170, 255);
    pub const BREAK: Color = Color::Rgb(130, 220, 180);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(45, 45, 60);
    pub const STATUS_KEY_BG: Color = Color::Rgb(70, 90, 140);

    // Timer states
    pub const RUNNING: Color = Color::Rgb(130, 220, 130);
    pub const PAUSED: Color = Color::Rgb(240, 200, 100);
    pub const ALERT: Color = Color::Rgb(240, 100, 100);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(130, 170, 255);
}

/// Timer state markers (ASCII so widths stay predictable).
pub struct Symbols;

impl Symbols {
    pub const RUNNING: &'static str = ">";
    pub const PAUSED: &'static str = "||";
    pub const SELECTED: &'static str = ">";
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted/selected item.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// The large time readout.
    pub fn time() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn running() -> Style {
        Style::default().fg(Palette::RUNNING).bg(Palette::BG)
    }

    pub fn paused() -> Style {
        Style::default().fg(Palette::PAUSED).bg(Palette::BG)
    }

    /// Finished countdowns and other alerts.
    pub fn alert() -> Style {
        Style::default()
            .fg(Palette::ALERT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Break phase accent.
    pub fn break_phase() -> Style {
        Style::default()
            .fg(Palette::BREAK)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}

/// Text progress bar for a percentage in `0.0..=100.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn progress_bar(percent: f64, width: usize) -> String {
    let fraction = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!("[{}{}] {:>3.0}%", "=".repeat(filled), " ".repeat(empty), fraction * 100.0)
}
