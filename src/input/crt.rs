//! Console byte source for Windows, on the C runtime's conio functions.
//!
//! `_getch` already reads unbuffered and without echo, so raw mode is a
//! no-op scope here.

use std::io;

use libc::c_int;

use super::ByteSource;

unsafe extern "C" {
    fn _getch() -> c_int;
    fn _kbhit() -> c_int;
}

/// The process console as a [`ByteSource`].
pub struct CrtSource;

/// Nothing to restore; `_getch` never changes the console mode.
pub struct NoopGuard;

impl ByteSource for CrtSource {
    type RawGuard = NoopGuard;

    fn enter_raw_mode(&mut self) -> io::Result<NoopGuard> {
        Ok(NoopGuard)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        // SAFETY: _getch has no preconditions.
        let ch = unsafe { _getch() };
        if ch < 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        Ok(ch as u8)
    }

    fn has_pending(&mut self) -> io::Result<bool> {
        // SAFETY: _kbhit has no preconditions.
        Ok(unsafe { _kbhit() } != 0)
    }
}
