//! Editor screen - the row form next to the chart pane, plus the
//! overlays that sit on top of it (path prompts and confirmations).

use crate::app::{App, Mode};
use crate::screens::Screen;
use crate::ui::theme::{Palette, Styles};
use crate::ui::{centered_fixed, editor_layout, truncate_to_width};
use gantty_core::RowField;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Width of the row-number gutter.
const INDEX_WIDTH: u16 = 3;

/// Column widths for name, comment, start and end, separated by one
/// space each. Sized so a full row fits the 46-column form pane.
const FIELD_WIDTHS: [u16; 4] = [12, 11, 8, 7];

/// The main editor: form grid on the left, chart pane on the right.
pub struct EditorScreen;

impl Screen for EditorScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (form_area, chart_area) = editor_layout(area);
        render_form(app, form_area, buf);
        app.chart.widget().render(chart_area, buf);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_form(app: &App, area: Rect, buf: &mut Buffer) {
    let border_style = if app.mode == Mode::Form {
        Styles::border_active()
    } else {
        Styles::border()
    };
    let block = Block::default()
        .title(format!(" Rows ({}) ", app.rows.len()))
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Styles::default());
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.height < 2 || inner.width < 16 {
        return;
    }

    render_grid_header(inner, buf);

    let visible = (inner.height - 1) as usize;
    let start = scroll_start(app.row_focus, app.rows.len(), visible);
    for (slot, index) in (start..app.rows.len()).take(visible).enumerate() {
        let y = inner.y + 1 + slot as u16;
        render_row(app, index, y, inner, buf);
    }
}

fn render_grid_header(inner: Rect, buf: &mut Buffer) {
    for (col, field) in RowField::ALL.iter().enumerate() {
        let x = column_x(inner, col);
        let width = usize::from(FIELD_WIDTHS[col]).min(usize::from(inner.right().saturating_sub(x)));
        buf.set_stringn(x, inner.y, field.label(), width, Styles::dim());
    }
}

fn render_row(app: &App, index: usize, y: u16, inner: Rect, buf: &mut Buffer) {
    let focused_row = index == app.row_focus && app.mode == Mode::Form;
    let index_style = if focused_row {
        Styles::highlight()
    } else {
        Styles::dim()
    };
    buf.set_stringn(
        inner.x,
        y,
        format!("{:>2}", index + 1),
        usize::from(INDEX_WIDTH),
        index_style,
    );

    for (col, field) in RowField::ALL.iter().enumerate() {
        let x = column_x(inner, col);
        let width = FIELD_WIDTHS[col].min(inner.right().saturating_sub(x));
        if width == 0 {
            continue;
        }
        let cell = Rect::new(x, y, width, 1);
        let focused_cell = focused_row && *field == app.field_focus;

        if focused_cell && app.editing {
            app.input.widget().focused(true).prompt("").render(cell, buf);
            continue;
        }

        let value = app.rows.field(index, *field);
        let (text, mut style) = if value.is_empty() && field.is_date() {
            ("MM.YYYY".to_string(), Styles::dim())
        } else {
            (truncate_to_width(value, usize::from(width)), Styles::default())
        };
        if focused_cell {
            style = Styles::editing();
            for cx in cell.left()..cell.right() {
                buf[(cx, y)].set_style(style);
            }
        }
        buf.set_stringn(x, y, &text, usize::from(width), style);
    }
}

fn column_x(inner: Rect, col: usize) -> u16 {
    let mut x = inner.x + INDEX_WIDTH;
    for width in &FIELD_WIDTHS[..col] {
        x += width + 1;
    }
    x
}

/// First visible row so that the focused row stays on screen.
fn scroll_start(focus: usize, len: usize, visible: usize) -> usize {
    if visible == 0 || focus < visible {
        0
    } else {
        (focus + 1 - visible).min(len.saturating_sub(visible))
    }
}

/// Prompt for a path to import, shown over the editor.
pub struct ImportPromptScreen;

impl Screen for ImportPromptScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_path_prompt(app, " Import from file ", area, buf);
    }
}

/// Prompt for a path to export to.
pub struct ExportPromptScreen;

impl Screen for ExportPromptScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_path_prompt(app, " Export to file ", area, buf);
    }
}

fn render_path_prompt(app: &App, title: &str, area: Rect, buf: &mut Buffer) {
    let width = 54.min(area.width.saturating_sub(4));
    let overlay = centered_fixed(width, 5, area);
    Clear.render(overlay, buf);

    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());
    let inner = block.inner(overlay);
    block.render(overlay, buf);
    if inner.height == 0 || inner.width < 4 {
        return;
    }

    let input_area = Rect::new(inner.x + 1, inner.y, inner.width - 2, 1);
    app.input.widget().prompt("> ").focused(true).render(input_area, buf);

    if inner.height >= 3 {
        buf.set_stringn(
            inner.x + 1,
            inner.y + 2,
            "Enter confirm   Esc cancel",
            usize::from(inner.width - 2),
            Styles::dim(),
        );
    }
}

/// "Really clear everything?" dialog.
pub struct ConfirmClearScreen;

impl Screen for ConfirmClearScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        render_confirm(
            " Clear all data? ",
            "Rows, settings and stored data are reset.",
            area,
            buf,
        );
    }
}

/// "Quit with unsaved changes?" dialog.
pub struct ConfirmQuitScreen;

impl Screen for ConfirmQuitScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer) {
        render_confirm(
            " Quit without saving? ",
            "Unsaved changes will be lost.",
            area,
            buf,
        );
    }
}

fn render_confirm(title: &str, message: &str, area: Rect, buf: &mut Buffer) {
    let width = 48.min(area.width.saturating_sub(4));
    let overlay = centered_fixed(width, 5, area);
    Clear.render(overlay, buf);

    let block = Block::default()
        .title(title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Palette::WARNING))
        .style(Styles::default());
    let inner = block.inner(overlay);
    block.render(overlay, buf);

    let lines = vec![
        Line::from(Span::styled(format!(" {message}"), Styles::default())),
        Line::default(),
        Line::from(Span::styled(" Enter confirm   Esc cancel", Styles::dim())),
    ];
    Paragraph::new(lines).render(inner, buf);
}
