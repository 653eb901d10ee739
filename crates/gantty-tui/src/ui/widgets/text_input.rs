//! Single-line text input widget.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Render view over a [`TextInputState`].
///
/// Marks the cursor with `|` on a character or `_` past the end, and
/// scrolls horizontally so the marker stays visible in narrow areas
/// (form cells are as narrow as 7 columns).
#[derive(Debug, Clone)]
pub struct TextInput<'a> {
    content: &'a str,
    cursor: usize,
    focused: bool,
    prompt: &'a str,
}

impl<'a> TextInput<'a> {
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Prompt prefix drawn before the text. Form cells use none.
    #[must_use]
    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let chars = self.content.chars().count();
        let mut display: Vec<char> = Vec::with_capacity(chars + 1);
        for (i, ch) in self.content.chars().enumerate() {
            if self.focused && i == self.cursor {
                display.push('|');
            }
            display.push(ch);
        }
        if self.focused && self.cursor >= chars {
            display.push('_');
        }

        let prompt_width = self.prompt.chars().count();
        let avail = usize::from(area.width).saturating_sub(prompt_width).max(1);

        // Slide the window only when the cursor would fall off the end
        let start = if self.focused && self.cursor + 1 > avail {
            (self.cursor + 1 - avail).min(display.len().saturating_sub(avail))
        } else {
            0
        };
        let visible: String = display[start..].iter().take(avail).collect();

        let line = Line::from(vec![
            Span::styled(self.prompt, Styles::active()),
            Span::raw(visible),
        ]);
        Paragraph::new(vec![line])
            .style(Styles::default())
            .render(area, buf);
    }
}

/// Content and cursor for a single-line edit.
///
/// The cursor is a character index, so multi-byte input edits at the
/// right position instead of panicking on a byte boundary.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    pub content: String,
    /// Cursor position as a character index.
    pub cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the content, placing the cursor at the end.
    pub fn set(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Hand the content to the caller and reset.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of the character the cursor sits on.
    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .map(|(at, _)| at)
            .nth(self.cursor)
            .unwrap_or(self.content.len())
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index();
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index();
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.content.remove(at);
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        let at = self.byte_index();
        if at < self.content.len() {
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Borrow the state as a renderable widget.
    pub fn widget(&self) -> TextInput<'_> {
        TextInput {
            content: &self.content,
            cursor: self.cursor,
            focused: true,
            prompt: "> ",
        }
    }
}
