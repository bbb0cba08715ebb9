//! Pure transitions: (Menu, key) → Transition.
//!
//! Cursor moves are applied here directly. Anything with an effect
//! (running an action, leaving the menu) is described, not performed;
//! the loop in `run` executes it.

use crate::types::{LogicalKey, MenuError};

use super::state::{Action, Binding, Menu};

/// What the loop should do after one key.
#[derive(Clone, Copy)]
pub enum Transition<'a> {
    /// Redraw and read the next key.
    Stay,
    /// Invoke this action, then redraw.
    Run(&'a dyn Action),
    /// Leave the menu.
    Quit,
}

impl std::fmt::Debug for Transition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Stay => f.write_str("Stay"),
            Transition::Run(_) => f.write_str("Run(..)"),
            Transition::Quit => f.write_str("Quit"),
        }
    }
}

/// Apply one decoded key to the menu.
///
/// # Errors
/// Returns [`MenuError::Empty`] when Confirm is pressed on a menu with no
/// entries.
pub fn update<'a>(menu: &mut Menu<'a>, key: Option<LogicalKey>) -> Result<Transition<'a>, MenuError> {
    let Some(key) = key else {
        return Ok(Transition::Stay);
    };

    match key {
        LogicalKey::Up => {
            menu.move_selection(-1);
            Ok(Transition::Stay)
        }
        LogicalKey::Down => {
            menu.move_selection(1);
            Ok(Transition::Stay)
        }
        // Reserved: no entry uses horizontal movement.
        LogicalKey::Left | LogicalKey::Right => Ok(Transition::Stay),
        LogicalKey::Confirm => match menu.current()?.binding() {
            Binding::Run(action) => Ok(Transition::Run(action)),
            Binding::Quit => Ok(Transition::Quit),
        },
        LogicalKey::Cancel => Ok(Transition::Quit),
    }
}

// ============================================================================
// TESTS
// ============================================================================
