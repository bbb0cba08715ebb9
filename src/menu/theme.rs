//! Menu color defaults and row markers.
//!
//! Pure data consumed by the renderer and the app layer.
//! White on black for idle rows, inverted for the cursor row.

use crossterm::style::Color;

use crate::types::{ColorPair, EntryColors};

// ============================================================================
// ROW MARKERS
// ============================================================================

/// Indicator printed before the cursor row. Always four columns.
pub const SELECTED_MARKER: &str = " -> ";

/// Padding printed before every other row.
pub const BLANK_MARKER: &str = "    ";

// ============================================================================
// COLORS
// ============================================================================

pub const NORMAL: ColorPair = ColorPair::new(Color::White, Color::Black);

pub const SELECTED: ColorPair = ColorPair::new(Color::Black, Color::White);

pub const DEFAULT_COLORS: EntryColors = EntryColors {
    normal: NORMAL,
    selected: SELECTED,
};

/// Parse a color name as written in the config file.
///
/// Accepts crossterm's names ("dark_grey", "red", ...) case-insensitively.
pub fn parse_color(name: &str) -> Option<Color> {
    Color::try_from(name.to_ascii_lowercase().as_str()).ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_four_columns() {
        assert_eq!(SELECTED_MARKER.len(), 4);
        assert_eq!(BLANK_MARKER.len(), 4);
        assert_ne!(SELECTED_MARKER, BLANK_MARKER);
    }

    #[test]
    fn selected_pair_inverts_normal() {
        assert_eq!(NORMAL.fg, SELECTED.bg);
        assert_eq!(NORMAL.bg, SELECTED.fg);
    }

    #[test]
    fn parse_color_accepts_names_in_any_case() {
        assert_eq!(parse_color("Red"), Some(Color::Red));
        assert_eq!(parse_color("dark_grey"), Some(Color::DarkGrey));
        assert_eq!(parse_color("chartreuse"), None);
    }
}
