//! Chart configuration and series building.
//!
//! The renderer is an external range-bar charting capability reached
//! through [`ChartSurface`]; this module owns everything up to that
//! boundary: the full base configuration the renderer boots from, the
//! patch of user-adjustable options, the row-to-series mapping, and the
//! update protocol (options first, then series).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date::epoch_range;
use crate::rows::TimelineRow;

/// The ten named color palettes the renderer understands.
pub const PALETTES: [&str; 10] = [
    "palette1", "palette2", "palette3", "palette4", "palette5", "palette6", "palette7", "palette8",
    "palette9", "palette10",
];

/// Placeholder range shown before any real data: 1970-01-01 to
/// 2038-01-19, in epoch milliseconds.
pub const PLACEHOLDER_RANGE: [i64; 2] = [0, 2_147_472_000_000];

pub fn is_valid_palette(name: &str) -> bool {
    PALETTES.contains(&name)
}

/// Error type for chart setting validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Value is required: {0}")]
    MissingValue(&'static str),

    #[error("Dimension must be a whole number of pixels: {0}")]
    BadDimension(String),

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),
}

/// User-adjustable chart settings.
///
/// Height and width stay numeric strings; they are pixel values passed
/// through to the chart configuration untouched. Palette and label
/// visibility are per-session and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSettings {
    pub title: String,
    pub height: String,
    pub width: String,
    pub palette: String,
    pub show_labels: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: "Timeline".to_string(),
            height: "400".to_string(),
            width: "900".to_string(),
            palette: "palette1".to_string(),
            show_labels: false,
        }
    }
}

impl ChartSettings {
    /// Validate before pushing to the renderer or saving.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.title.is_empty() {
            return Err(SettingsError::MissingValue("title"));
        }
        Self::validate_dimension(&self.height)?;
        Self::validate_dimension(&self.width)?;
        if !is_valid_palette(&self.palette) {
            return Err(SettingsError::UnknownPalette(self.palette.clone()));
        }
        Ok(())
    }

    fn validate_dimension(value: &str) -> Result<(), SettingsError> {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SettingsError::BadDimension(value.to_string()));
        }
        Ok(())
    }
}

/// One bar of the range series: `x` is the bar label (the row name),
/// `y` the `[start, end]` epoch-millisecond pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub x: String,
    pub y: [i64; 2],
    pub comment: String,
}

/// A named series of range points. The chart always carries exactly one,
/// unnamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<SeriesPoint>,
}

/// Map rows to series points, one per row in order.
///
/// The output length always equals the input length; rows with empty or
/// malformed dates are charted with epoch-zero endpoints rather than
/// dropped, and reversed chronology passes through unvalidated.
pub fn build_series(rows: &[TimelineRow]) -> Vec<SeriesPoint> {
    rows.iter()
        .map(|row| SeriesPoint {
            x: row.name.clone(),
            y: epoch_range(&row.start_time, &row.end_time),
            comment: row.comment.clone(),
        })
        .collect()
}

/// Data label text for the bar at `index`: the point's comment, or empty
/// when there is none. Lookup is by index into the current series, so it
/// stays correct across series replacements.
pub fn label_for(data: &[SeriesPoint], index: usize) -> &str {
    data.get(index).map_or("", |point| point.comment.as_str())
}

// ---------------------------------------------------------------------------
// Base configuration
// ---------------------------------------------------------------------------

/// The full configuration the renderer boots from. Everything here except
/// the leaves carried by [`OptionsPatch`] is a fixed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub title: TitleOptions,
    pub chart: FrameOptions,
    pub plot_options: PlotOptions,
    pub data_labels: DataLabelOptions,
    pub xaxis: XAxisOptions,
    pub tooltip: TooltipOptions,
    pub grid: GridOptions,
    pub theme: ThemeOptions,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleOptions {
    pub text: String,
    pub align: String,
    pub style: TitleStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleStyle {
    pub font_size: String,
    pub font_weight: String,
    pub font_family: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOptions {
    pub height: String,
    pub width: String,
    pub responsive: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub toolbar: ToolbarOptions,
    pub zoom: ZoomOptions,
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolbarOptions {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomOptions {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub auto_scale_yaxis: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotOptions {
    pub bar: BarOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    pub distributed: bool,
    pub horizontal: bool,
    pub bar_height: String,
    pub data_labels: BarDataLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataLabels {
    pub hide_overflowing_labels: bool,
    pub position: String,
    pub enabled: bool,
}

/// Data label styling. The label text itself is not part of the
/// configuration; renderers obtain it per bar through [`label_for`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelOptions {
    pub enabled: bool,
    pub hide_overflowing_labels: bool,
    pub style: DataLabelStyle,
    pub background: DataLabelBackground,
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelStyle {
    pub colors: Vec<String>,
    pub font_size: String,
    pub font_family: String,
    pub font_weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLabelBackground {
    pub enabled: bool,
    pub fore_color: String,
    pub border_radius: u32,
    pub padding: u32,
    pub opacity: f64,
    pub border_width: u32,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOptions {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    pub row: GridRowOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRowOptions {
    pub colors: Vec<String>,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeOptions {
    pub palette: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: TitleOptions {
                text: "Timeline".to_string(),
                align: "center".to_string(),
                style: TitleStyle {
                    font_size: "20px".to_string(),
                    font_weight: "bold".to_string(),
                    font_family: "Manrope, sans-serif".to_string(),
                    color: "#263238".to_string(),
                },
            },
            chart: FrameOptions {
                height: "400px".to_string(),
                width: "900px".to_string(),
                responsive: true,
                kind: "rangeBar".to_string(),
                toolbar: ToolbarOptions { show: true },
                zoom: ZoomOptions {
                    enabled: true,
                    kind: "x".to_string(),
                    auto_scale_yaxis: true,
                },
                background: "white".to_string(),
            },
            plot_options: PlotOptions {
                bar: BarOptions {
                    distributed: true,
                    horizontal: true,
                    bar_height: "30%".to_string(),
                    data_labels: BarDataLabels {
                        hide_overflowing_labels: false,
                        position: "center".to_string(),
                        enabled: true,
                    },
                },
            },
            data_labels: DataLabelOptions {
                enabled: true,
                hide_overflowing_labels: false,
                style: DataLabelStyle {
                    colors: vec!["#ffffff".to_string()],
                    font_size: "12px".to_string(),
                    font_family: "Manrope, sans-serif".to_string(),
                    font_weight: 600,
                },
                background: DataLabelBackground {
                    enabled: true,
                    fore_color: "#000000".to_string(),
                    border_radius: 4,
                    padding: 6,
                    opacity: 0.8,
                    border_width: 1,
                    border_color: "#cccccc".to_string(),
                },
                offset_x: 0,
                offset_y: 0,
            },
            xaxis: XAxisOptions {
                kind: "datetime".to_string(),
                categories: Vec::new(),
            },
            tooltip: TooltipOptions { enabled: false },
            grid: GridOptions {
                row: GridRowOptions {
                    colors: vec!["#f3f3f3".to_string(), "transparent".to_string()],
                    opacity: 0.5,
                },
            },
            theme: ThemeOptions {
                palette: "palette1".to_string(),
            },
            series: vec![Series {
                name: String::new(),
                data: vec![SeriesPoint {
                    x: String::new(),
                    y: PLACEHOLDER_RANGE,
                    comment: String::new(),
                }],
            }],
        }
    }
}

impl ChartOptions {
    /// Merge a patch into this configuration. Only the patch's leaves
    /// change; every other field keeps its current value.
    pub fn apply_patch(&mut self, patch: &OptionsPatch) {
        self.theme.palette = patch.theme.palette.clone();
        self.title.text = patch.title.text.clone();
        self.chart.height = patch.chart.height.clone();
        self.chart.width = patch.chart.width.clone();
        self.plot_options.bar.data_labels.enabled = patch.plot_options.bar.data_labels.enabled;
        self.data_labels.enabled = patch.data_labels.enabled;
    }

    /// Swap in new data for the single unnamed series.
    pub fn replace_series_data(&mut self, data: Vec<SeriesPoint>) {
        self.series = vec![Series {
            name: String::new(),
            data,
        }];
    }
}

// ---------------------------------------------------------------------------
// The options patch
// ---------------------------------------------------------------------------

/// The nested structure [`build_options`] produces: it overrides only the
/// title text, the chart pixel height/width, the palette identifier, and
/// the two data-label visibility flags. Everything else stays at the base
/// configuration's constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsPatch {
    pub theme: ThemePatch,
    pub title: TitlePatch,
    pub chart: SizePatch,
    pub plot_options: PlotPatch,
    pub data_labels: EnabledPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemePatch {
    pub palette: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePatch {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizePatch {
    pub height: String,
    pub width: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlotPatch {
    pub bar: BarPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPatch {
    pub data_labels: EnabledPatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledPatch {
    pub enabled: bool,
}

/// Build the options patch for the given settings.
pub fn build_options(settings: &ChartSettings) -> OptionsPatch {
    OptionsPatch {
        theme: ThemePatch {
            palette: settings.palette.clone(),
        },
        title: TitlePatch {
            text: settings.title.clone(),
        },
        chart: SizePatch {
            height: settings.height.clone(),
            width: settings.width.clone(),
        },
        plot_options: PlotPatch {
            bar: BarPatch {
                data_labels: EnabledPatch {
                    enabled: settings.show_labels,
                },
            },
        },
        data_labels: EnabledPatch {
            enabled: settings.show_labels,
        },
    }
}

// ---------------------------------------------------------------------------
// The renderer boundary
// ---------------------------------------------------------------------------

/// The external renderer, created once and mutated in place.
///
/// `apply_options` merges an options patch; `redraw` says whether the
/// surface must refresh immediately and `update_colors` whether it must
/// re-derive palette colors. `replace_series` swaps the charted data and
/// always refreshes.
pub trait ChartSurface {
    fn apply_options(&mut self, patch: &OptionsPatch, redraw: bool, update_colors: bool);

    fn replace_series(&mut self, data: Vec<SeriesPoint>);
}

/// Push the current rows and settings to a surface.
///
/// Options go first, without a redraw but with a color update, then the
/// series replacement triggers the single visible refresh. Reversing the
/// order would flash the new data against stale colors and title.
pub fn push_update<S: ChartSurface + ?Sized>(
    surface: &mut S,
    rows: &[TimelineRow],
    settings: &ChartSettings,
) {
    let patch = build_options(settings);
    surface.apply_options(&patch, false, true);
    surface.replace_series(build_series(rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<TimelineRow> {
        vec![
            TimelineRow::new("Project 1", "Comment", "01.2024", "12.2024"),
            TimelineRow::new("Project 2", "", "02.2024", "11.2024"),
        ]
    }

    #[test]
    fn test_build_series_one_point_per_row() {
        let rows = sample_rows();
        let data = build_series(&rows);

        assert_eq!(data.len(), rows.len());
        assert_eq!(data[0].x, "Project 1");
        assert_eq!(data[1].x, "Project 2");
        assert_eq!(data[0].comment, "Comment");
        assert_eq!(data[1].comment, "");
        assert!(data[0].y[0] < data[0].y[1]);
    }

    #[test]
    fn test_build_series_keeps_rows_with_empty_dates() {
        let rows = vec![
            TimelineRow::new("Drafted", "", "", ""),
            TimelineRow::new("Broken", "", "nonsense", "01.2024"),
        ];
        let data = build_series(&rows);

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].y, [0, 0]);
        assert_eq!(data[1].y[0], 0);
        assert!(data[1].y[1] > 0);
    }

    #[test]
    fn test_build_series_passes_reversed_ranges_through() {
        let rows = vec![TimelineRow::new("Backwards", "", "12.2024", "01.2024")];
        let data = build_series(&rows);
        assert!(data[0].y[0] > data[0].y[1]);
    }

    #[test]
    fn test_label_for_returns_comment_or_empty() {
        let data = build_series(&sample_rows());
        assert_eq!(label_for(&data, 0), "Comment");
        assert_eq!(label_for(&data, 1), "");
        assert_eq!(label_for(&data, 99), "");
    }

    #[test]
    fn test_label_for_tracks_series_replacement() {
        let first = build_series(&sample_rows());
        assert_eq!(label_for(&first, 0), "Comment");

        let second = build_series(&[TimelineRow::new("Other", "Replaced", "03.2024", "04.2024")]);
        assert_eq!(label_for(&second, 0), "Replaced");
        assert_eq!(label_for(&second, 1), "");
    }

    #[test]
    fn test_build_options_carries_settings() {
        let settings = ChartSettings {
            title: "My Chart".to_string(),
            height: "500".to_string(),
            width: "800".to_string(),
            palette: "palette3".to_string(),
            show_labels: true,
        };

        let patch = build_options(&settings);
        assert_eq!(patch.title.text, "My Chart");
        assert_eq!(patch.chart.height, "500");
        assert_eq!(patch.chart.width, "800");
        assert_eq!(patch.theme.palette, "palette3");
        assert!(patch.data_labels.enabled);
        assert!(patch.plot_options.bar.data_labels.enabled);
    }

    #[test]
    fn test_patch_json_spelling() {
        let patch = build_options(&ChartSettings::default());
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["theme"]["palette"], "palette1");
        assert_eq!(json["title"]["text"], "Timeline");
        assert_eq!(json["chart"]["height"], "400");
        assert_eq!(json["chart"]["width"], "900");
        assert_eq!(json["plotOptions"]["bar"]["dataLabels"]["enabled"], false);
        assert_eq!(json["dataLabels"]["enabled"], false);
    }

    #[test]
    fn test_default_options_constants() {
        let json = serde_json::to_value(ChartOptions::default()).unwrap();

        assert_eq!(json["chart"]["type"], "rangeBar");
        assert_eq!(json["chart"]["height"], "400px");
        assert_eq!(json["chart"]["width"], "900px");
        assert_eq!(json["chart"]["zoom"]["autoScaleYaxis"], true);
        assert_eq!(json["plotOptions"]["bar"]["distributed"], true);
        assert_eq!(json["plotOptions"]["bar"]["horizontal"], true);
        assert_eq!(json["plotOptions"]["bar"]["barHeight"], "30%");
        assert_eq!(json["dataLabels"]["style"]["fontWeight"], 600);
        assert_eq!(json["tooltip"]["enabled"], false);
        assert_eq!(json["grid"]["row"]["colors"][0], "#f3f3f3");
        assert_eq!(json["grid"]["row"]["colors"][1], "transparent");
        assert_eq!(json["grid"]["row"]["opacity"], 0.5);
        assert_eq!(json["theme"]["palette"], "palette1");
        assert_eq!(json["title"]["style"]["fontFamily"], "Manrope, sans-serif");
    }

    #[test]
    fn test_default_options_placeholder_series() {
        let options = ChartOptions::default();
        assert_eq!(options.series.len(), 1);
        assert_eq!(options.series[0].name, "");
        assert_eq!(options.series[0].data.len(), 1);
        assert_eq!(options.series[0].data[0].y, PLACEHOLDER_RANGE);
    }

    #[test]
    fn test_apply_patch_touches_only_its_leaves() {
        let mut options = ChartOptions::default();
        let settings = ChartSettings {
            title: "Roadmap".to_string(),
            height: "600".to_string(),
            width: "1200".to_string(),
            palette: "palette5".to_string(),
            show_labels: true,
        };

        options.apply_patch(&build_options(&settings));

        assert_eq!(options.title.text, "Roadmap");
        assert_eq!(options.chart.height, "600");
        assert_eq!(options.chart.width, "1200");
        assert_eq!(options.theme.palette, "palette5");
        assert!(options.data_labels.enabled);
        assert!(options.plot_options.bar.data_labels.enabled);
        // constants untouched
        assert_eq!(options.chart.kind, "rangeBar");
        assert_eq!(options.plot_options.bar.bar_height, "30%");
        assert_eq!(options.title.align, "center");
        assert!(!options.tooltip.enabled);
    }

    #[test]
    fn test_replace_series_data() {
        let mut options = ChartOptions::default();
        options.replace_series_data(build_series(&sample_rows()));

        assert_eq!(options.series.len(), 1);
        assert_eq!(options.series[0].name, "");
        assert_eq!(options.series[0].data.len(), 2);
    }

    #[test]
    fn test_series_point_json_shape() {
        let point = SeriesPoint {
            x: "Project 1".to_string(),
            y: [0, 100],
            comment: "c".to_string(),
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"x":"Project 1","y":[0,100],"comment":"c"}"#);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ChartSettings::default();
        assert_eq!(settings.title, "Timeline");
        assert_eq!(settings.height, "400");
        assert_eq!(settings.width, "900");
        assert_eq!(settings.palette, "palette1");
        assert!(!settings.show_labels);
    }

    #[test]
    fn test_settings_validation() {
        assert!(ChartSettings::default().validate().is_ok());

        let settings = ChartSettings {
            title: String::new(),
            ..ChartSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::MissingValue("title"))
        ));

        let settings = ChartSettings {
            height: "40a".to_string(),
            ..ChartSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BadDimension(_))
        ));

        let settings = ChartSettings {
            width: String::new(),
            ..ChartSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::BadDimension(_))
        ));

        let settings = ChartSettings {
            palette: "palette99".to_string(),
            ..ChartSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::UnknownPalette(_))
        ));
    }

    #[test]
    fn test_palette_registry() {
        assert!(is_valid_palette("palette1"));
        assert!(is_valid_palette("palette10"));
        assert!(!is_valid_palette("palette11"));
        assert!(!is_valid_palette(""));
    }

    /// Records surface calls to check the update protocol.
    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
        last_patch: Option<OptionsPatch>,
        data: Vec<SeriesPoint>,
    }

    impl ChartSurface for RecordingSurface {
        fn apply_options(&mut self, patch: &OptionsPatch, redraw: bool, update_colors: bool) {
            self.calls.push(format!("options({redraw},{update_colors})"));
            self.last_patch = Some(patch.clone());
        }

        fn replace_series(&mut self, data: Vec<SeriesPoint>) {
            self.calls.push("series".to_string());
            self.data = data;
        }
    }

    #[test]
    fn test_push_update_orders_options_before_series() {
        let mut surface = RecordingSurface::default();
        push_update(&mut surface, &sample_rows(), &ChartSettings::default());

        assert_eq!(surface.calls, vec!["options(false,true)", "series"]);
        assert_eq!(surface.data.len(), 2);
        let patch = surface.last_patch.unwrap();
        assert_eq!(patch.title.text, "Timeline");
    }

    #[test]
    fn test_push_update_repeats_on_same_surface() {
        let mut surface = RecordingSurface::default();
        let settings = ChartSettings::default();

        push_update(&mut surface, &sample_rows(), &settings);
        push_update(&mut surface, &[], &settings);

        assert_eq!(
            surface.calls,
            vec![
                "options(false,true)",
                "series",
                "options(false,true)",
                "series"
            ]
        );
        assert!(surface.data.is_empty());
    }
}
