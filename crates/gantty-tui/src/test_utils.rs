//! Shared helpers for rendering and key-flow tests.
//!
//! Tests render through [`render_app_to_string`] into an in-memory
//! buffer and assert on the text, so no real terminal is involved.

use crate::app::App;
use crate::screens;
use ratatui::{buffer::Buffer, layout::Rect};
use tempfile::TempDir;

/// Canonical terminal size for rendering tests.
const TEST_WIDTH: u16 = 80;
const TEST_HEIGHT: u16 = 24;

/// Create a test app backed by a temporary data directory.
///
/// The returned guard owns the directory; keep it alive for as long as
/// the app is in use.
pub fn create_test_app() -> (TempDir, App) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let app = App::new(dir.path()).expect("Failed to create test app");
    (dir, app)
}

/// Flatten a buffer into text, one line per row.
///
/// Rows are right-trimmed and there is no trailing newline, so exact
/// comparisons and substring checks both read naturally.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let rows: Vec<String> = (area.y..area.bottom())
        .map(|y| {
            let line: String = (area.x..area.right())
                .filter_map(|x| buffer.cell((x, y)))
                .map(ratatui::buffer::Cell::symbol)
                .collect();
            line.trim_end().to_string()
        })
        .collect();
    rows.join("\n")
}

/// Render the whole interface for `app` and return it as a string.
pub fn render_app_to_string(app: &App) -> String {
    render_app_to_string_sized(app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render the whole interface with custom dimensions.
pub fn render_app_to_string_sized(app: &App, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screens::draw(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    #[test]
    fn test_create_test_app() {
        let (dir, app) = create_test_app();
        assert!(dir.path().exists());
        assert_eq!(app.rows.len(), 1);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_buffer_to_string_trims_and_joins() {
        let area = Rect::new(0, 0, 8, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Chart", Style::default());
        buffer.set_string(2, 2, "bars", Style::default());

        assert_eq!(buffer_to_string(&buffer), "Chart\n\n  bars");
    }
}
