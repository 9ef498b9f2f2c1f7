//! Single-line text input for the countdown label.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Longest label accepted, in characters.
pub const MAX_LABEL_CHARS: usize = 40;

/// State for a label being edited, with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelInputState {
    content: String,
    cursor: usize,
}

impl LabelInputState {
    /// Start editing with existing text, cursor at the end.
    pub fn with_content(content: &str) -> Self {
        let content: String = content.chars().take(MAX_LABEL_CHARS).collect();
        let cursor = content.chars().count();
        Self { content, cursor }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor. Ignored once the label is full.
    pub fn insert(&mut self, ch: char) {
        if ch.is_control() || self.content.chars().count() >= MAX_LABEL_CHARS {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor >= self.content.chars().count() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.content.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    /// Take the trimmed content, clearing the state.
    pub fn take(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        content.trim().to_string()
    }
}

/// Renders a [`LabelInputState`] as `> text` with a cursor marker.
#[derive(Debug, Clone)]
pub struct LabelInput<'a> {
    state: &'a LabelInputState,
    placeholder: &'a str,
}

impl<'a> LabelInput<'a> {
    pub fn new(state: &'a LabelInputState) -> Self {
        Self {
            state,
            placeholder: "",
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

impl Widget for LabelInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let mut spans = vec![Span::styled("> ", Styles::active())];
        if self.state.is_empty() {
            spans.push(Span::styled("_", Styles::active()));
            spans.push(Span::styled(self.placeholder, Styles::dim()));
        } else {
            let before: String = self.state.content.chars().take(self.state.cursor).collect();
            let after: String = self.state.content.chars().skip(self.state.cursor).collect();
            spans.push(Span::styled(before, Styles::default()));
            spans.push(Span::styled(
                if after.is_empty() { "_" } else { "|" },
                Styles::active(),
            ));
            spans.push(Span::styled(after, Styles::default()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
