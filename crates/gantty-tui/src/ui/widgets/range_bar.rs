//! Range-bar chart surface and widget.
//!
//! [`RangeBarChart`] is the terminal implementation of the chart
//! surface: it holds the full option tree plus the current series and
//! draws a horizontal range-bar chart with a month axis. Options reach
//! it only through patches and series swaps, the same narrow interface
//! a browser charting library would be driven through.

use crate::ui::theme::{series_colors, Styles, Symbols};
use crate::ui::truncate_to_width;
use gantty_core::{label_for, ChartOptions, ChartSurface, MonthYear, OptionsPatch, SeriesPoint};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Terminal cells per chart pixel. The settings carry pixel dimensions;
/// the widget converts them to a cell budget and clamps to the pane.
const PX_PER_COLUMN: u32 = 10;
const PX_PER_ROW: u32 = 20;

/// The chart state: option tree, series and the resolved bar colors.
#[derive(Debug, Clone)]
pub struct RangeBarChart {
    options: ChartOptions,
    colors: [Color; 5],
}

impl RangeBarChart {
    /// A chart in its initial state: base options and the placeholder
    /// series spanning 1970 to 2038.
    pub fn new() -> Self {
        let options = ChartOptions::default();
        let colors = series_colors(&options.theme.palette);
        Self { options, colors }
    }

    /// The current option tree.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Points of the single unnamed series.
    pub fn data(&self) -> &[SeriesPoint] {
        self.options
            .series
            .first()
            .map_or(&[], |series| series.data.as_slice())
    }

    /// Build the render view for this chart.
    pub fn widget(&self) -> RangeBarView<'_> {
        RangeBarView { chart: self }
    }
}

impl Default for RangeBarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartSurface for RangeBarChart {
    /// Merge an options patch. Bar colors are only re-resolved from the
    /// palette name when `update_colors` is set; a patch applied without
    /// it changes the stored palette but keeps drawing with the old
    /// colors until the next full update.
    fn apply_options(&mut self, patch: &OptionsPatch, _redraw: bool, update_colors: bool) {
        self.options.apply_patch(patch);
        if update_colors {
            self.colors = series_colors(&self.options.theme.palette);
        }
    }

    fn replace_series(&mut self, data: Vec<SeriesPoint>) {
        self.options.replace_series_data(data);
    }
}

/// Render view borrowing a [`RangeBarChart`].
pub struct RangeBarView<'a> {
    chart: &'a RangeBarChart,
}

impl RangeBarView<'_> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_axis(&self, plot: Rect, buf: &mut Buffer, min: i64, max: i64) {
        let (Some(first), Some(last)) = (month_of(min), month_of(max)) else {
            return;
        };

        // Sparse labels: draw every step-th month so MM.YYYY labels
        // never collide.
        let total_months =
            i64::from(last.year() - first.year()) * 12 + i64::from(last.month()) + 1
                - i64::from(first.month());
        let step = (total_months * 9 / i64::from(plot.width).max(1) + 1).max(1) as usize;

        let mut month = first;
        let mut index = 0usize;
        loop {
            let t = month.epoch_ms();
            if t > max {
                break;
            }
            if t >= min {
                let c = column_for(t, min, max, plot.width);
                buf.set_string(plot.x + c, plot.y, Symbols::TICK, Styles::dim());
                if index % step == 0 {
                    let label = month.to_string();
                    let label_width = u16::try_from(label.len()).unwrap_or(u16::MAX);
                    if c.saturating_add(label_width) <= plot.width {
                        buf.set_string(plot.x + c, plot.y, &label, Styles::dim());
                    }
                }
            }
            // Month arithmetic saturates at 12.9999; stop before it wraps
            if month.month() == 12 && month.year() == 9999 {
                break;
            }
            month = month.next();
            index += 1;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_bars(&self, plot: Rect, buf: &mut Buffer, min: i64, max: i64, name_width: u16) {
        let data = self.chart.data();
        let labels_on =
            self.chart.options.data_labels.enabled
                && self.chart.options.plot_options.bar.data_labels.enabled;

        for (i, point) in data.iter().enumerate() {
            if i as u16 >= plot.height {
                break;
            }
            let y = plot.y + i as u16;

            // Row name in the left column
            if name_width > 0 {
                let name = truncate_to_width(&point.x, name_width as usize);
                buf.set_string(plot.x.saturating_sub(name_width + 1), y, &name, Styles::default());
            }

            // The series builder does not order endpoints; draw the span
            let lo = point.y[0].min(point.y[1]);
            let hi = point.y[0].max(point.y[1]);
            let c0 = column_for(lo, min, max, plot.width);
            let c1 = column_for(hi, min, max, plot.width);
            let color = self.chart.colors[i % self.chart.colors.len()];
            for cx in c0..=c1 {
                let cell = &mut buf[(plot.x + cx, y)];
                cell.set_symbol(Symbols::BAR);
                cell.set_fg(color);
            }

            // Centered comment label on top of the bar
            if labels_on {
                let label = label_for(data, i);
                if !label.is_empty() {
                    let bar_width = usize::from(c1 - c0 + 1);
                    let text = truncate_to_width(label, bar_width);
                    let offset = (bar_width.saturating_sub(text.width())) / 2;
                    buf.set_string(
                        plot.x + c0 + offset as u16,
                        y,
                        &text,
                        Style::default()
                            .fg(Color::White)
                            .bg(color)
                            .add_modifier(Modifier::BOLD),
                    );
                }
            }
        }
    }
}

impl Widget for RangeBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let opts = &self.chart.options;

        let title = if opts.title.text.is_empty() {
            " Chart ".to_string()
        } else {
            format!(" {} ", opts.title.text)
        };
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());
        let outer = block.inner(area);
        block.render(area, buf);

        let inner = sized_area(outer, &opts.chart.height, &opts.chart.width);
        if inner.width < 16 || inner.height < 3 {
            return;
        }

        let data = self.chart.data();
        let Some((min, max)) = domain(data) else {
            buf.set_string(inner.x + 1, inner.y + 1, "No data", Styles::dim());
            return;
        };

        // Left name column, sized to the widest name on display
        let name_width = data
            .iter()
            .take(usize::from(inner.height) - 1)
            .map(|point| point.x.width())
            .max()
            .unwrap_or(0)
            .min(16);
        let name_width = u16::try_from(name_width).unwrap_or(16);
        let gap = u16::from(name_width > 0);

        let plot_x = inner.x + name_width + gap;
        let plot_width = inner.width.saturating_sub(name_width + gap);
        if plot_width < 10 {
            return;
        }

        self.render_axis(Rect::new(plot_x, inner.y, plot_width, 1), buf, min, max);
        self.render_bars(
            Rect::new(plot_x, inner.y + 1, plot_width, inner.height - 1),
            buf,
            min,
            max,
            name_width,
        );
    }
}

/// Cell budget for a pixel dimension like `"400"` or `"400px"`.
fn cell_budget(px: &str, px_per_cell: u32) -> Option<u16> {
    let px: u32 = px.trim().trim_end_matches("px").parse().ok()?;
    u16::try_from((px / px_per_cell).max(1)).ok()
}

/// Clamp the configured pixel size to the available pane.
fn sized_area(outer: Rect, height_px: &str, width_px: &str) -> Rect {
    let width = cell_budget(width_px, PX_PER_COLUMN)
        .unwrap_or(outer.width)
        .min(outer.width);
    let height = cell_budget(height_px, PX_PER_ROW)
        .unwrap_or(outer.height)
        .min(outer.height);
    Rect::new(outer.x, outer.y, width, height)
}

/// Epoch range covered by the series, `None` when there are no points.
fn domain(data: &[SeriesPoint]) -> Option<(i64, i64)> {
    let min = data.iter().map(|p| p.y[0].min(p.y[1])).min()?;
    let max = data.iter().map(|p| p.y[0].max(p.y[1])).max()?;
    // A degenerate domain still needs a nonzero span to divide by
    Some((min, max.max(min + 1)))
}

/// Map an epoch timestamp to a column in `0..width`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn column_for(t: i64, min: i64, max: i64, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let span = (max - min).max(1) as i128;
    let offset = i128::from(t.clamp(min, max) - min);
    ((offset * i128::from(width - 1)) / span) as u16
}

/// The calendar month containing an epoch timestamp.
fn month_of(epoch_ms: i64) -> Option<MonthYear> {
    use chrono::{DateTime, Datelike};
    let dt = DateTime::from_timestamp_millis(epoch_ms)?;
    MonthYear::new(dt.month(), dt.year()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use gantty_core::{push_update, ChartSettings, TimelineRow, PLACEHOLDER_RANGE};

    fn sample_rows() -> Vec<TimelineRow> {
        vec![
            TimelineRow::new("Design", "kickoff", "01.2024", "04.2024"),
            TimelineRow::new("Build", "", "03.2024", "10.2024"),
        ]
    }

    fn render(chart: &RangeBarChart, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        chart.widget().render(area, &mut buffer);
        buffer_to_string(&buffer)
    }

    #[test]
    fn test_new_chart_carries_placeholder_series() {
        let chart = RangeBarChart::new();
        assert_eq!(chart.data().len(), 1);
        assert_eq!(chart.data()[0].y, PLACEHOLDER_RANGE);
        assert_eq!(chart.data()[0].x, "");
    }

    #[test]
    fn test_apply_options_respects_update_colors_flag() {
        let mut chart = RangeBarChart::new();
        let before = chart.colors;

        let settings = ChartSettings {
            palette: "palette3".to_string(),
            ..ChartSettings::default()
        };
        let patch = gantty_core::build_options(&settings);

        chart.apply_options(&patch, false, false);
        assert_eq!(chart.options().theme.palette, "palette3");
        assert_eq!(chart.colors, before, "colors stay until update_colors");

        chart.apply_options(&patch, false, true);
        assert_eq!(chart.colors, series_colors("palette3"));
    }

    #[test]
    fn test_push_update_replaces_series_and_options() {
        let mut chart = RangeBarChart::new();
        let settings = ChartSettings {
            title: "Roadmap".to_string(),
            palette: "palette2".to_string(),
            ..ChartSettings::default()
        };
        let rows = sample_rows();

        push_update(&mut chart, &rows, &settings);

        assert_eq!(chart.options().title.text, "Roadmap");
        assert_eq!(chart.data().len(), 2);
        assert_eq!(chart.data()[0].x, "Design");
        assert_eq!(chart.colors, series_colors("palette2"));
    }

    #[test]
    fn test_render_shows_names_axis_and_bars() {
        let mut chart = RangeBarChart::new();
        let settings = ChartSettings::default();
        push_update(&mut chart, &sample_rows(), &settings);

        let out = render(&chart, 80, 20);
        assert!(out.contains("Design"));
        assert!(out.contains("Build"));
        assert!(out.contains("Timeline"), "title from settings: {out}");
        assert!(out.contains('\u{2588}'), "bars drawn: {out}");
        assert!(out.contains(".2024"), "axis labels drawn: {out}");
    }

    #[test]
    fn test_render_labels_follow_settings_flag() {
        let mut chart = RangeBarChart::new();

        let mut settings = ChartSettings {
            show_labels: true,
            ..ChartSettings::default()
        };
        push_update(&mut chart, &sample_rows(), &settings);
        assert!(render(&chart, 80, 20).contains("kickoff"));

        settings.show_labels = false;
        push_update(&mut chart, &sample_rows(), &settings);
        assert!(!render(&chart, 80, 20).contains("kickoff"));
    }

    #[test]
    fn test_render_placeholder_fills_plot() {
        let chart = RangeBarChart::new();
        let out = render(&chart, 60, 12);
        assert!(out.contains('\u{2588}'));
        assert!(out.contains("1970"), "placeholder spans the epoch: {out}");
    }

    #[test]
    fn test_render_survives_tiny_area() {
        let mut chart = RangeBarChart::new();
        push_update(&mut chart, &sample_rows(), &ChartSettings::default());
        // Must not panic, even when nothing fits
        let _ = render(&chart, 8, 3);
        let _ = render(&chart, 2, 1);
    }

    #[test]
    fn test_cell_budget_accepts_px_suffix() {
        assert_eq!(cell_budget("400", PX_PER_ROW), Some(20));
        assert_eq!(cell_budget("400px", PX_PER_ROW), Some(20));
        assert_eq!(cell_budget("900", PX_PER_COLUMN), Some(90));
        assert_eq!(cell_budget("abc", PX_PER_COLUMN), None);
    }

    #[test]
    fn test_column_for_maps_domain_to_plot() {
        assert_eq!(column_for(0, 0, 100, 50), 0);
        assert_eq!(column_for(100, 0, 100, 50), 49);
        assert_eq!(column_for(50, 0, 100, 50), 24);
        // Out-of-domain values clamp instead of wrapping
        assert_eq!(column_for(-5, 0, 100, 50), 0);
        assert_eq!(column_for(200, 0, 100, 50), 49);
    }

    #[test]
    fn test_domain_handles_reversed_and_empty() {
        assert_eq!(domain(&[]), None);

        let reversed = vec![SeriesPoint {
            x: "r".to_string(),
            y: [200, 100],
            comment: String::new(),
        }];
        assert_eq!(domain(&reversed), Some((100, 200)));
    }
}
