//! Rendering: draw a [`Menu`] through the console primitives.
//!
//! Read-only over the menu. One frame = clear, blank line, one line per
//! entry, flush.

use crate::console::Console;

use super::state::Menu;
use super::theme;

/// Draw every entry, highlighting the cursor row.
pub fn render(menu: &Menu<'_>, console: &mut dyn Console) {
    console.clear();
    console.print("\n");

    for (i, entry) in menu.entries().iter().enumerate() {
        let is_selected = i == menu.selected();
        console.print(if is_selected {
            theme::SELECTED_MARKER
        } else {
            theme::BLANK_MARKER
        });

        let pair = entry.colors().for_state(is_selected);
        console.set_color(pair.fg, pair.bg);
        console.print(entry.title());
        console.reset_color();
        console.print("\n");
    }

    console.flush();
}

// ============================================================================
// TESTS
// ============================================================================
