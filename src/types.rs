//! Domain types for numcrypt.
//!
//! Shared vocabulary between the input decoders, the menu engine and the
//! application layer. No I/O lives here.

use std::io;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// LOGICAL KEYS
// ============================================================================

/// Platform-independent key vocabulary.
///
/// Every raw byte sequence decodes into one of these, or into `None` when
/// nothing recognizable was read. `None` never mutates menu state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKey {
    Left,
    Right,
    Up,
    Down,
    /// Enter / space.
    Confirm,
    /// Standalone escape.
    Cancel,
}

// ============================================================================
// COLORS
// ============================================================================

/// Foreground/background pair applied to one menu row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColorPair {
    pub const fn new(fg: Color, bg: Color) -> Self {
        ColorPair { fg, bg }
    }
}

/// Colors for an entry in each selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryColors {
    /// Used when the row is not under the cursor.
    pub normal: ColorPair,
    /// Used for the cursor row.
    pub selected: ColorPair,
}

impl EntryColors {
    /// Pick the pair for a row given whether the cursor is on it.
    pub fn for_state(&self, is_selected: bool) -> ColorPair {
        if is_selected { self.selected } else { self.normal }
    }
}

// ============================================================================
// POLICIES
// ============================================================================

/// What moving the cursor off either end of the menu does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapPolicy {
    /// Past the last entry goes to the first, before the first goes to the last.
    #[default]
    Symmetric,
    /// Past the last entry goes to the first, before the first stays at the first.
    #[serde(rename = "reset")]
    ResetOnUnderflow,
}

/// Output format for the scripted subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failures surfaced by the menu engine.
///
/// Decode anomalies never show up here; they collapse into `None` keys.
#[derive(Debug, Error)]
pub enum MenuError {
    /// More entries were added than the menu was built for.
    #[error("menu is full ({capacity} entries)")]
    Overflow { capacity: usize },

    /// An operation needed a current entry but the menu has none.
    #[error("menu has no entries")]
    Empty,

    /// The terminal could not be read or configured.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// TESTS
// ============================================================================
