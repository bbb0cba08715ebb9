//! Menu navigation engine.
//!
//! Organized along the same pure/effects split as the rest of the crate:
//! - `state`: entries, bindings and the selection cursor (pure)
//! - `update`: one key in, one [`update::Transition`] out (pure)
//! - `view`: drawing a menu through the console primitives
//! - `run`: the render / decode / dispatch loop (effects)
//! - `theme`: default colors and row markers

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::run;
pub use state::{Action, Binding, Entry, Menu};
pub use update::{update, Transition};
