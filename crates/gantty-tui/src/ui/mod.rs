//! UI building blocks for the gantty TUI.

pub mod theme;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A `width` by `height` rect centered inside `area`.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Split the frame into the content area and a one-row status line.
pub fn main_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Split the editor area into the form pane and the chart pane.
///
/// The form keeps a fixed width so the chart gets everything the
/// terminal has to spare; on very narrow terminals the form wins.
pub fn editor_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(20)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Truncate a string to a display width, appending an ellipsis when
/// something was cut. Width-aware so wide characters don't overflow
/// narrow form cells.
pub fn truncate_to_width(s: &str, max: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if max == 0 {
        return String::new();
    }
    if s.width() <= max {
        return s.to_string();
    }

    let budget = max - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a long project name", 8), "a long \u{2026}");
        assert_eq!(truncate_to_width("abc", 3), "abc");
        assert_eq!(truncate_to_width("abcd", 3), "ab\u{2026}");
        assert_eq!(truncate_to_width("anything", 0), "");
    }
}
