//! Screen definitions for the gantty TUI.

pub mod editor;
pub mod settings;

pub use editor::{
    ConfirmClearScreen, ConfirmQuitScreen, EditorScreen, ExportPromptScreen, ImportPromptScreen,
};
pub use settings::SettingsScreen;

use crate::app::{App, Mode};
use crate::ui::theme::{Palette, Styles, Symbols};
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::ui::main_layout;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// A full-frame view drawn from the app state. Each mode maps to one.
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render the whole interface: the editor, any overlay for the active
/// mode, the help overlay and the status bar.
pub fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    let (content, status) = main_layout(area);

    EditorScreen.render(app, content, buf);
    match app.mode {
        Mode::Form => {}
        Mode::Settings => SettingsScreen.render(app, content, buf),
        Mode::ImportPrompt => ImportPromptScreen.render(app, content, buf),
        Mode::ExportPrompt => ExportPromptScreen.render(app, content, buf),
        Mode::ConfirmClear => ConfirmClearScreen.render(app, content, buf),
        Mode::ConfirmQuit => ConfirmQuitScreen.render(app, content, buf),
    }
    if app.show_help {
        render_help_overlay(content, buf);
    }
    render_status_bar(app, status, buf);
}

fn mode_chip(app: &App) -> &'static str {
    if app.editing {
        return "EDIT";
    }
    match app.mode {
        Mode::Form => "FORM",
        Mode::Settings => "SETTINGS",
        Mode::ImportPrompt => "IMPORT",
        Mode::ExportPrompt => "EXPORT",
        Mode::ConfirmClear | Mode::ConfirmQuit => "CONFIRM",
    }
}

fn render_status_bar(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = if app.editing || matches!(app.mode, Mode::ImportPrompt | Mode::ExportPrompt) {
        vec![
            KeyHint::new("Enter", "confirm"),
            KeyHint::new("Esc", "cancel"),
        ]
    } else {
        match app.mode {
            Mode::Form => vec![
                KeyHint::new("a", "add"),
                KeyHint::new("d", "del"),
                KeyHint::new("g", "chart"),
                KeyHint::new("s", "settings"),
                KeyHint::new("w", "save"),
                KeyHint::new("?", "help"),
            ],
            Mode::Settings => vec![
                KeyHint::new("j/k", "move"),
                KeyHint::new("Enter", "edit"),
                KeyHint::new("h/l", "cycle"),
                KeyHint::new("Esc", "back"),
            ],
            _ => vec![
                KeyHint::new("Enter", "confirm"),
                KeyHint::new("Esc", "cancel"),
            ],
        }
    };

    let (right_text, right_style) = status_right(app);
    let mut bar = StatusBar::new(mode_chip(app)).hints(hints);
    if let Some(text) = right_text.as_deref() {
        bar = bar.right(text).right_style(right_style);
    }
    bar.render(area, buf);
}

/// Right-hand status text: the active notification wins, then import
/// progress, then the unsaved-changes marker.
fn status_right(app: &App) -> (Option<String>, Style) {
    if let Some(notice) = &app.notice {
        let (symbol, style) = if notice.error {
            (Symbols::ERROR, Styles::error())
        } else {
            (Symbols::CHECK, Styles::success())
        };
        return (Some(format!("{symbol} {}", notice.text)), style);
    }
    if app.import_in_progress {
        let spin = Symbols::SPINNER[app.tick % Symbols::SPINNER.len()];
        return (Some(format!("{spin} importing")), Styles::dim());
    }
    if app.dirty {
        let style = Style::default().fg(Palette::WARNING);
        return (Some("modified".to_string()), style);
    }
    (None, Styles::status_bar())
}

/// Key reference overlay, toggled with `?`.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph};

    let help_text = r"
  Rows
    j/k or Up/Down    Move between rows
    h/l or Left/Right Move between cells
    Tab / Shift+Tab   Next/prev cell
    Enter             Edit the focused cell
    + / -             Step a date cell by a month
    a / d             Add / delete a row

  Chart
    g                 Generate the chart
    s                 Chart settings
    w                 Save rows and settings
    r                 Reload saved data
    i / e             Import / export a file
    c                 Clear everything

    q                 Quit
    ?                 Toggle this help

  [press any key]
";

    let width = 50.min(area.width.saturating_sub(4));
    let height = 24.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    Paragraph::new(help_text)
        .block(block)
        .style(Styles::default())
        .render(overlay_area, buf);
}
