//! Test doubles for the terminal: a scripted byte source and a console
//! that records what was drawn.

use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use crossterm::style::Color;

use crate::console::Console;
use crate::input::ByteSource;

// ============================================================================
// SCRIPTED INPUT
// ============================================================================

/// Replays keystrokes. Each keystroke is a burst of bytes that arrive
/// together: `has_pending` is true only while the current burst has bytes
/// left, so a lone ESC burst decodes as Cancel even if more keystrokes
/// follow.
pub struct ScriptedSource {
    bursts: VecDeque<VecDeque<u8>>,
    depth: Rc<Cell<usize>>,
    max_depth: Rc<Cell<usize>>,
    entries: usize,
}

impl ScriptedSource {
    /// All bytes arrive as one burst.
    pub fn new(bytes: &[u8]) -> Self {
        Self::keystrokes(&[bytes])
    }

    /// One burst per keystroke.
    pub fn keystrokes(strokes: &[&[u8]]) -> Self {
        ScriptedSource {
            bursts: strokes
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| s.iter().copied().collect())
                .collect(),
            depth: Rc::new(Cell::new(0)),
            max_depth: Rc::new(Cell::new(0)),
            entries: 0,
        }
    }

    /// Bytes not yet consumed, across all bursts.
    pub fn remaining(&self) -> Vec<u8> {
        self.bursts.iter().flatten().copied().collect()
    }

    /// Raw-mode scopes currently open.
    pub fn raw_depth(&self) -> usize {
        self.depth.get()
    }

    /// Shared view of the raw-mode depth, readable while the source is
    /// owned by a decoder.
    pub fn depth_handle(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.depth)
    }

    /// Deepest raw-mode nesting ever observed.
    pub fn max_raw_depth(&self) -> usize {
        self.max_depth.get()
    }

    /// How many times raw mode was entered.
    pub fn raw_entries(&self) -> usize {
        self.entries
    }
}

/// Decrements the shared depth counter on drop.
pub struct DepthGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

impl ByteSource for ScriptedSource {
    type RawGuard = DepthGuard;

    fn enter_raw_mode(&mut self) -> io::Result<DepthGuard> {
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        self.max_depth.set(self.max_depth.get().max(depth));
        self.entries += 1;
        Ok(DepthGuard {
            depth: Rc::clone(&self.depth),
        })
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        while let Some(burst) = self.bursts.front_mut() {
            if let Some(byte) = burst.pop_front() {
                return Ok(byte);
            }
            self.bursts.pop_front();
        }
        Err(io::ErrorKind::UnexpectedEof.into())
    }

    fn has_pending(&mut self) -> io::Result<bool> {
        Ok(self.bursts.front().is_some_and(|b| !b.is_empty()))
    }
}

// ============================================================================
// RECORDING CONSOLE
// ============================================================================

/// One console primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Clear,
    Color(Color, Color),
    Reset,
    Text(String),
    Flush,
}

#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub ops: Vec<Op>,
}

impl RecordingConsole {
    /// Ops drawn since the last clear.
    pub fn last_frame(&self) -> &[Op] {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == Op::Clear)
            .unwrap_or(0);
        &self.ops[start..]
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| **op == Op::Clear).count()
    }
}

impl Console for RecordingConsole {
    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn set_color(&mut self, fg: Color, bg: Color) {
        self.ops.push(Op::Color(fg, bg));
    }

    fn reset_color(&mut self) {
        self.ops.push(Op::Reset);
    }

    fn print(&mut self, text: &str) {
        self.ops.push(Op::Text(text.to_string()));
    }

    fn flush(&mut self) {
        self.ops.push(Op::Flush);
    }
}
