//! Bottom status line: mode chip, key hints, right-aligned notice.

use crate::ui::theme::{Palette, Styles};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// A key cap and the hint text shown after it.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// One-line status bar: mode chip and key hints on the left, an
/// optional notice on the right. The notice keeps its space when the
/// bar is narrow; the hints truncate into what remains.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    right_text: Option<&'a str>,
    right_style: Style,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            right_text: None,
            right_style: Styles::status_bar(),
        }
    }

    /// Hints listed after the mode chip.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Right-aligned text, usually the active notice.
    #[must_use]
    pub fn right(mut self, text: &'a str) -> Self {
        self.right_text = Some(text);
        self
    }

    /// Set the style for the right-aligned text (notices use this to
    /// show errors in red).
    #[must_use]
    pub fn right_style(mut self, style: Style) -> Self {
        self.right_style = style.bg(Palette::STATUS_BG);
        self
    }

    fn left_line(&self) -> Line<'static> {
        let chip = Styles::default().bg(Palette::ACCENT).fg(Palette::BG);
        let mut spans = vec![Span::styled(format!(" {} ", self.mode), chip)];
        for hint in &self.hints {
            spans.push(Span::styled(" ", Styles::status_bar()));
            spans.push(Span::styled(format!(" {} ", hint.key), Styles::key_hint()));
            spans.push(Span::styled(format!(" {} ", hint.label), Styles::key_label()));
        }
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width == 0 {
            return;
        }

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_symbol(" ").set_style(Styles::status_bar());
        }

        let mut left_max = area.width;
        let mut right = None;
        if let Some(text) = self.right_text {
            let needed = u16::try_from(text.width()).unwrap_or(u16::MAX).saturating_add(1);
            if needed < area.width {
                left_max = area.width - needed - 1;
                right = Some((area.right() - needed, text));
            }
        }

        buf.set_line(area.x, area.y, &self.left_line(), left_max);
        if let Some((x, text)) = right {
            buf.set_string(x, area.y, text, self.right_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(bar: StatusBar<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buffer = Buffer::empty(area);
        bar.render(area, &mut buffer);
        buffer_to_string(&buffer)
    }

    #[test]
    fn test_mode_and_hints_render_left() {
        let bar = StatusBar::new("FORM").hints(vec![
            KeyHint::new("a", "add"),
            KeyHint::new("q", "quit"),
        ]);
        let out = render(bar, 60);
        assert!(out.starts_with(" FORM "));
        assert!(out.contains(" a  add "));
        assert!(out.contains(" q  quit "));
    }

    #[test]
    fn test_right_text_is_right_aligned() {
        let bar = StatusBar::new("FORM").right("modified");
        let out = render(bar, 40);
        assert!(out.trim_end().ends_with("modified"));
        assert_eq!(out.find("modified"), Some(40 - "modified".len() - 1));
    }

    #[test]
    fn test_notice_outranks_hints_when_narrow() {
        let bar = StatusBar::new("FORM")
            .hints(vec![
                KeyHint::new("Enter", "confirm"),
                KeyHint::new("Esc", "cancel"),
            ])
            .right("modified");
        let out = render(bar, 30);
        assert!(out.contains("modified"));
        assert!(!out.contains("cancel"), "hints truncate first: {out}");
    }

    #[test]
    fn test_right_text_dropped_when_wider_than_the_bar() {
        let bar = StatusBar::new("FORM").right("a very long status notice");
        let out = render(bar, 20);
        assert!(!out.contains("notice"));
    }
}
