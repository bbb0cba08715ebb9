//! Menu state algebra: entries, bindings and the selection cursor.
//!
//! Pure data plus cursor arithmetic. Nothing here touches the terminal;
//! the renderer reads a [`Menu`] and the loop mutates it through
//! [`Menu::move_selection`].

use crate::types::{EntryColors, MenuError, WrapPolicy};

// ============================================================================
// ACTIONS
// ============================================================================

/// Behavior bound to a menu entry: invokable with no arguments, no result.
///
/// Failures inside an action are the action's own business; the loop
/// neither catches nor reports them.
pub trait Action {
    fn run(&self);
}

impl<F: Fn()> Action for F {
    fn run(&self) {
        self()
    }
}

/// What confirming an entry does.
#[derive(Clone, Copy)]
pub enum Binding<'a> {
    /// Invoke externally-owned behavior, then return to the menu.
    Run(&'a dyn Action),
    /// Leave the menu, like Cancel.
    Quit,
}

impl std::fmt::Debug for Binding<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Run(_) => f.write_str("Run(..)"),
            Binding::Quit => f.write_str("Quit"),
        }
    }
}

// ============================================================================
// ENTRIES
// ============================================================================

/// One selectable row. Immutable once built.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    title: String,
    colors: EntryColors,
    binding: Binding<'a>,
}

impl<'a> Entry<'a> {
    /// An entry that runs `action` on confirm.
    pub fn new(title: impl Into<String>, colors: EntryColors, action: &'a dyn Action) -> Self {
        Entry {
            title: title.into(),
            colors,
            binding: Binding::Run(action),
        }
    }

    /// An entry that leaves the menu on confirm.
    pub fn quit(title: impl Into<String>, colors: EntryColors) -> Self {
        Entry {
            title: title.into(),
            colors,
            binding: Binding::Quit,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn colors(&self) -> &EntryColors {
        &self.colors
    }

    pub fn binding(&self) -> Binding<'a> {
        self.binding
    }
}

// ============================================================================
// MENU
// ============================================================================

/// Ordered, fixed-capacity list of entries with a selection cursor.
///
/// Invariant: `selected < len()` whenever the menu is non-empty, and
/// `selected == 0` when it is empty. `len()` never exceeds `capacity()`.
#[derive(Debug)]
pub struct Menu<'a> {
    entries: Vec<Entry<'a>>,
    capacity: usize,
    selected: usize,
    wrap: WrapPolicy,
}

impl<'a> Menu<'a> {
    /// Create an empty menu that accepts at most `capacity` entries.
    pub fn new(capacity: usize, wrap: WrapPolicy) -> Self {
        Menu {
            entries: Vec::with_capacity(capacity),
            capacity,
            selected: 0,
            wrap,
        }
    }

    /// Append an entry. Display order is insertion order.
    ///
    /// # Errors
    /// Returns [`MenuError::Overflow`] when the menu is already full.
    pub fn add_entry(&mut self, entry: Entry<'a>) -> Result<(), MenuError> {
        if self.entries.len() >= self.capacity {
            return Err(MenuError::Overflow {
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Shift the cursor by `delta` rows under the menu's wrap policy.
    ///
    /// A no-op on an empty menu.
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.entries.len();
        if count == 0 {
            return;
        }
        self.selected = step(self.selected, delta, count, self.wrap);
    }

    /// The entry under the cursor.
    ///
    /// # Errors
    /// Returns [`MenuError::Empty`] when no entries were added.
    pub fn current(&self) -> Result<&Entry<'a>, MenuError> {
        self.entries.get(self.selected).ok_or(MenuError::Empty)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }
}

/// Cursor arithmetic. `count` must be non-zero.
fn step(selected: usize, delta: isize, count: usize, wrap: WrapPolicy) -> usize {
    let target = selected as isize + delta;
    match wrap {
        WrapPolicy::Symmetric => target.rem_euclid(count as isize) as usize,
        // Anything at or below zero collapses to the first row.
        WrapPolicy::ResetOnUnderflow => {
            if target > 0 {
                target as usize % count
            } else {
                0
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
