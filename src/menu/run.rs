//! Effects boundary: the render / decode / dispatch loop.
//!
//! The only blocking points are the byte read inside the decoder and the
//! body of an invoked action. Raw mode is owned by the decoder and never
//! outlives a single decode, so actions always run in canonical mode.

use log::{debug, info};

use crate::console::Console;
use crate::input::KeyDecoder;
use crate::types::MenuError;

use super::state::Menu;
use super::update::{update, Transition};
use super::view::render;

/// Run the menu until it is left via Cancel or a quit entry.
///
/// On leaving, the display is cleared and control returns to the caller.
/// Actions may call `run` again on a menu of their own; leaving that
/// nested menu returns to the action.
///
/// # Errors
/// Terminal read failures (including end of input) and Confirm on an
/// empty menu end the loop with an error.
pub fn run(
    menu: &mut Menu<'_>,
    decoder: &mut dyn KeyDecoder,
    console: &mut dyn Console,
) -> Result<(), MenuError> {
    loop {
        render(menu, console);

        let key = decoder.decode_one_event()?;
        debug!("key {key:?} at row {}", menu.selected());

        match update(menu, key)? {
            Transition::Stay => {}
            Transition::Run(action) => {
                if let Ok(entry) = menu.current() {
                    info!("running '{}'", entry.title());
                }
                action.run();
            }
            Transition::Quit => {
                debug!("leaving menu");
                console.clear();
                console.flush();
                return Ok(());
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
