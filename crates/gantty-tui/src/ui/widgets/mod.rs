//! Reusable widgets for the gantty TUI.

pub mod range_bar;
pub mod status_bar;
pub mod text_input;

pub use range_bar::RangeBarChart;
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::{TextInput, TextInputState};
