//! Colors, glyphs, and text styles for the TUI chrome.

use ratatui::style::{Color, Modifier, Style};

/// Chrome colors.
///
/// The accents and notice colors pick up series colors from the
/// default chart palette so the chrome and the plot read as one.
pub struct Palette;

impl Palette {
    pub const BG: Color = Color::Rgb(24, 26, 32);
    pub const FG: Color = Color::Rgb(222, 224, 232);
    pub const DIM: Color = Color::Rgb(130, 135, 155);

    pub const ACCENT: Color = Color::Rgb(0, 143, 251);
    pub const ACCENT_DIM: Color = Color::Rgb(0, 84, 148);

    pub const STATUS_BG: Color = Color::Rgb(40, 44, 56);
    pub const STATUS_KEY_BG: Color = Color::Rgb(50, 90, 140);

    pub const SUCCESS: Color = Color::Rgb(0, 227, 150);
    pub const WARNING: Color = Color::Rgb(254, 176, 25);
    pub const ERROR: Color = Color::Rgb(255, 69, 96);

    pub const BORDER: Color = Color::Rgb(75, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(0, 143, 251);
}

/// Glyphs for the chrome and the chart plot.
pub struct Symbols;

impl Symbols {
    /// Prefix for a success notice.
    pub const CHECK: &'static str = "\u{2713}"; // ✓
    /// Prefix for an error notice.
    pub const ERROR: &'static str = "\u{2717}"; // ✗
    /// Braille dots cycle shown while an import read is in flight.
    pub const SPINNER: [&'static str; 10] = [
        "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}",
        "\u{2834}", "\u{2826}", "\u{2827}", "\u{2807}", "\u{280f}",
    ];

    /// Body of a range bar.
    pub const BAR: &'static str = "\u{2588}"; // █
    /// Axis tick at a month boundary.
    pub const TICK: &'static str = "\u{2502}"; // │
}

/// Named text styles.
///
/// Widgets go through these rather than raw colors so focus and
/// status render the same on every screen.
pub struct Styles;

fn on_bg(fg: Color) -> Style {
    Style::default().fg(fg).bg(Palette::BG)
}

impl Styles {
    /// Base text.
    pub fn default() -> Style {
        on_bg(Palette::FG)
    }

    /// Secondary text.
    pub fn dim() -> Style {
        on_bg(Palette::DIM)
    }

    /// Pane and overlay titles.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Focused element accents, like the prompt prefix.
    pub fn active() -> Style {
        on_bg(Palette::ACCENT)
    }

    /// The focused cell or field.
    pub fn highlight() -> Style {
        on_bg(Palette::ACCENT).add_modifier(Modifier::BOLD)
    }

    /// The cell currently open for editing.
    pub fn editing() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::ACCENT_DIM)
            .add_modifier(Modifier::BOLD)
    }

    /// Unfocused pane border.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Focused pane border.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Key cap in the status bar.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Hint text following a key cap.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    pub fn success() -> Style {
        on_bg(Palette::SUCCESS)
    }

    pub fn error() -> Style {
        on_bg(Palette::ERROR)
    }
}

/// The five series colors of a named chart palette.
///
/// These are the `palette1`..`palette10` color sets the chart
/// configuration refers to by name. Bars cycle through the five colors
/// in row order. Unknown names fall back to `palette1`, matching the
/// settings validation which refuses to persist them.
pub fn series_colors(palette: &str) -> [Color; 5] {
    match palette {
        "palette2" => [
            Color::Rgb(63, 81, 181),
            Color::Rgb(3, 169, 244),
            Color::Rgb(76, 175, 80),
            Color::Rgb(249, 206, 29),
            Color::Rgb(255, 152, 0),
        ],
        "palette3" => [
            Color::Rgb(51, 178, 223),
            Color::Rgb(84, 110, 122),
            Color::Rgb(212, 82, 110),
            Color::Rgb(19, 216, 170),
            Color::Rgb(165, 151, 139),
        ],
        "palette4" => [
            Color::Rgb(78, 205, 196),
            Color::Rgb(199, 244, 100),
            Color::Rgb(129, 212, 250),
            Color::Rgb(84, 110, 122),
            Color::Rgb(253, 106, 106),
        ],
        "palette5" => [
            Color::Rgb(43, 144, 143),
            Color::Rgb(249, 163, 164),
            Color::Rgb(144, 238, 126),
            Color::Rgb(250, 68, 67),
            Color::Rgb(105, 210, 231),
        ],
        "palette6" => [
            Color::Rgb(68, 157, 209),
            Color::Rgb(248, 102, 36),
            Color::Rgb(234, 53, 70),
            Color::Rgb(102, 46, 155),
            Color::Rgb(197, 216, 109),
        ],
        "palette7" => [
            Color::Rgb(215, 38, 61),
            Color::Rgb(27, 153, 139),
            Color::Rgb(46, 41, 78),
            Color::Rgb(244, 96, 54),
            Color::Rgb(226, 192, 68),
        ],
        "palette8" => [
            Color::Rgb(102, 46, 155),
            Color::Rgb(248, 102, 36),
            Color::Rgb(249, 200, 14),
            Color::Rgb(234, 53, 70),
            Color::Rgb(67, 188, 205),
        ],
        "palette9" => [
            Color::Rgb(92, 71, 66),
            Color::Rgb(165, 151, 139),
            Color::Rgb(141, 91, 76),
            Color::Rgb(90, 42, 39),
            Color::Rgb(196, 187, 175),
        ],
        "palette10" => [
            Color::Rgb(163, 0, 214),
            Color::Rgb(125, 2, 235),
            Color::Rgb(86, 83, 254),
            Color::Rgb(41, 131, 255),
            Color::Rgb(0, 177, 242),
        ],
        _ => [
            Color::Rgb(0, 143, 251),
            Color::Rgb(0, 227, 150),
            Color::Rgb(254, 176, 25),
            Color::Rgb(255, 69, 96),
            Color::Rgb(119, 93, 208),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_colors_default_palette() {
        let colors = series_colors("palette1");
        assert_eq!(colors[0], Color::Rgb(0, 143, 251));
        assert_eq!(colors[4], Color::Rgb(119, 93, 208));
    }

    #[test]
    fn test_series_colors_unknown_falls_back() {
        assert_eq!(series_colors("palette99"), series_colors("palette1"));
        assert_eq!(series_colors(""), series_colors("palette1"));
    }

    #[test]
    fn test_series_colors_are_distinct_per_palette() {
        assert_ne!(series_colors("palette1"), series_colors("palette2"));
        assert_ne!(series_colors("palette9"), series_colors("palette10"));
    }
}
