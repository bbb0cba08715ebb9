//! Console primitives: clear, colors, text.
//!
//! The menu renders through the [`Console`] trait. The interface is
//! infallible: a failed write is logged and dropped, never reported back
//! to the menu.

use std::cell::RefCell;
use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Colors, Print, ResetColor, SetColors};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use log::warn;

/// Minimal drawing surface the renderer needs.
pub trait Console {
    /// Blank the display and home the cursor.
    fn clear(&mut self);
    fn set_color(&mut self, fg: Color, bg: Color);
    fn reset_color(&mut self);
    fn print(&mut self, text: &str);
    /// Push queued output to the device.
    fn flush(&mut self);
}

/// [`Console`] over any writer using ANSI escape sequences.
pub struct AnsiConsole<W: Write> {
    out: W,
}

impl AnsiConsole<io::Stdout> {
    pub fn stdout() -> Self {
        AnsiConsole::new(io::stdout())
    }
}

impl<W: Write> AnsiConsole<W> {
    pub fn new(out: W) -> Self {
        AnsiConsole { out }
    }

    /// Recover the writer, e.g. to inspect what was drawn.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn report(&mut self, op: &str, result: io::Result<()>) {
        if let Err(e) = result {
            warn!("console {op} failed: {e}");
        }
    }
}

impl<W: Write> Console for AnsiConsole<W> {
    fn clear(&mut self) {
        let result = self
            .out
            .queue(Clear(ClearType::All))
            .and_then(|out| out.queue(MoveTo(0, 0)))
            .map(|_| ());
        self.report("clear", result);
    }

    fn set_color(&mut self, fg: Color, bg: Color) {
        let result = self.out.queue(SetColors(Colors::new(fg, bg))).map(|_| ());
        self.report("set_color", result);
    }

    fn reset_color(&mut self) {
        let result = self.out.queue(ResetColor).map(|_| ());
        self.report("reset_color", result);
    }

    fn print(&mut self, text: &str) {
        let result = self.out.queue(Print(text)).map(|_| ());
        self.report("print", result);
    }

    fn flush(&mut self) {
        let result = self.out.flush();
        self.report("flush", result);
    }
}

/// Shared console for nested menus; each primitive borrows it briefly.
impl<C: Console + ?Sized> Console for &RefCell<C> {
    fn clear(&mut self) {
        self.borrow_mut().clear();
    }

    fn set_color(&mut self, fg: Color, bg: Color) {
        self.borrow_mut().set_color(fg, bg);
    }

    fn reset_color(&mut self) {
        self.borrow_mut().reset_color();
    }

    fn print(&mut self, text: &str) {
        self.borrow_mut().print(text);
    }

    fn flush(&mut self) {
        self.borrow_mut().flush();
    }
}

// ============================================================================
// TESTS
// ============================================================================
