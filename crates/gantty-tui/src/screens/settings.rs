//! Chart settings overlay: title, pixel dimensions, palette and labels.

use crate::app::{App, SettingsField};
use crate::screens::Screen;
use crate::ui::theme::{series_colors, Styles, Symbols};
use crate::ui::{centered_fixed, truncate_to_width};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

const LABEL_WIDTH: usize = 12;

pub struct SettingsScreen;

impl Screen for SettingsScreen {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let width = 46.min(area.width.saturating_sub(4));
        let height = 10.min(area.height.saturating_sub(2));
        let overlay = centered_fixed(width, height, area);
        Clear.render(overlay, buf);

        let block = Block::default()
            .title(" Chart settings ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .style(Styles::default());
        let inner = block.inner(overlay);
        block.render(overlay, buf);
        if inner.width < 4 {
            return;
        }

        for (i, field) in SettingsField::ALL.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.bottom() {
                break;
            }
            let line = Rect::new(inner.x + 1, y, inner.width - 2, 1);
            render_field(app, *field, line, buf);
        }

        if inner.height > SettingsField::ALL.len() as u16 + 1 {
            buf.set_stringn(
                inner.x + 1,
                inner.bottom() - 1,
                "Enter edit/cycle   Esc close",
                usize::from(inner.width - 2),
                Styles::dim(),
            );
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_field(app: &App, field: SettingsField, area: Rect, buf: &mut Buffer) {
    let focused = field == app.settings_focus;
    let marker = if focused { "\u{203a} " } else { "  " };
    let label_style = if focused { Styles::highlight() } else { Styles::dim() };
    let label = format!("{marker}{:<width$}", field.label(), width = LABEL_WIDTH);
    buf.set_string(area.x, area.y, &label, label_style);

    let value_x = area.x + 2 + LABEL_WIDTH as u16;
    let value_width = area.right().saturating_sub(value_x);
    if value_width == 0 {
        return;
    }
    let value_area = Rect::new(value_x, area.y, value_width, 1);

    if focused && app.editing && field.is_text() {
        app.input.widget().focused(true).prompt("").render(value_area, buf);
        return;
    }

    let value_style = if focused { Styles::highlight() } else { Styles::default() };
    match field {
        SettingsField::Title => draw_value(&app.settings.title, value_style, value_area, buf),
        SettingsField::Height => draw_value(&app.settings.height, value_style, value_area, buf),
        SettingsField::Width => draw_value(&app.settings.width, value_style, value_area, buf),
        SettingsField::Palette => {
            // Palette name plus its five series colors as swatches.
            let mut spans = vec![Span::styled(
                format!("{:<10}", app.settings.palette),
                value_style,
            )];
            for color in series_colors(&app.settings.palette) {
                spans.push(Span::styled(
                    Symbols::BAR.repeat(2),
                    Style::default().fg(color),
                ));
            }
            Paragraph::new(Line::from(spans)).render(value_area, buf);
        }
        SettingsField::Labels => {
            let text = if app.settings.show_labels { "on" } else { "off" };
            draw_value(text, value_style, value_area, buf);
        }
    }
}

fn draw_value(value: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let text = truncate_to_width(value, usize::from(area.width));
    buf.set_stringn(area.x, area.y, &text, usize::from(area.width), style);
}
