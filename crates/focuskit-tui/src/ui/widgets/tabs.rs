//! Tab bar widget.

use crate::ui::theme::{Styles, Symbols};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

/// One tab: a title and whether its timer is running in the background.
#[derive(Debug, Clone, Copy)]
pub struct TabItem<'a> {
    pub title: &'a str,
    pub running: bool,
}

/// A horizontal tab bar widget.
#[derive(Debug, Clone)]
pub struct Tabs<'a> {
    items: Vec<TabItem<'a>>,
    selected: usize,
}

impl<'a> Tabs<'a> {
    /// Create a new tabs widget.
    pub fn new(items: Vec<TabItem<'a>>) -> Self {
        Self { items, selected: 0 }
    }

    /// Set the selected tab index.
    #[must_use]
    pub fn select(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }
}

impl Widget for Tabs<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let mut spans = vec![Span::styled(" ", Styles::default())];
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            if i > 0 {
                spans.push(Span::styled(" | ", Styles::dim()));
            }

            let style = if is_selected {
                Styles::highlight()
            } else {
                Styles::dim()
            };
            spans.push(Span::styled(format!("[{}] ", i + 1), style));
            spans.push(Span::styled(
                item.title,
                if is_selected {
                    Styles::highlight()
                } else {
                    Styles::default()
                },
            ));
            if item.running {
                spans.push(Span::styled(format!(" {}", Symbols::RUNNING), Styles::running()));
            }
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
