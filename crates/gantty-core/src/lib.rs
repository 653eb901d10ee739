//! gantty-core: Headless core for the gantty timeline chart builder
//!
//! This crate provides everything up to the rendering boundary:
//! - Timeline rows and the form-backing row list
//! - The `MM.YYYY` date codec and epoch-range conversion
//! - Chart configuration, series building, and the renderer contract
//! - The comma-separated import/export format
//! - Key-value persistence for rows and settings

pub mod chart;
pub mod date;
pub mod exchange;
pub mod rows;
pub mod storage;

// Flat re-exports so callers skip the module paths
pub use chart::{
    build_options, build_series, is_valid_palette, label_for, push_update, ChartOptions,
    ChartSettings, ChartSurface, OptionsPatch, Series, SeriesPoint, SettingsError, PALETTES,
    PLACEHOLDER_RANGE,
};
pub use date::{epoch_range, FormatError, MonthYear};
pub use exchange::{parse_document, serialize_document, Document, ExportError, ParseError};
pub use rows::{RowField, RowStore, TimelineRow};
pub use storage::{
    DataStore, FileStore, KvStore, MemoryStore, StorageError, KEY_CHART_HEIGHT, KEY_CHART_TITLE,
    KEY_CHART_WIDTH, KEY_INPUT_ROWS,
};

/// Returns the core version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
