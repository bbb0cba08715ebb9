//! Raw keyboard decoding.
//!
//! Turns a blocking byte stream into [`LogicalKey`]s. All escape-sequence
//! knowledge lives in this module; the menu loop only sees
//! [`KeyDecoder::decode_one_event`].
//!
//! Layout:
//! - [`ByteSource`]: raw-mode scope, blocking read, non-blocking peek
//! - `ansi`: decoding tables for unix terminals (CSI / SS3)
//! - `conio`: decoding tables for the Windows console (0xE0 prefix codes)
//! - `tty` / `crt`: the real byte sources for each platform

use std::cell::RefCell;
use std::io;

use crate::types::LogicalKey;

pub mod ansi;
pub mod conio;

#[cfg(windows)]
pub mod crt;
#[cfg(unix)]
pub mod tty;

pub use ansi::AnsiDecoder;
pub use conio::ConioDecoder;

// ============================================================================
// TRAITS
// ============================================================================

/// A blocking byte-oriented input device.
pub trait ByteSource {
    /// Restores the previous terminal mode when dropped.
    type RawGuard;

    /// Switch to unbuffered, non-echoing input until the guard drops.
    fn enter_raw_mode(&mut self) -> io::Result<Self::RawGuard>;

    /// Block until one byte is available. End of input is
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Whether more bytes are already buffered. Never blocks.
    fn has_pending(&mut self) -> io::Result<bool>;
}

/// Uniform decoder interface the menu loop programs against.
pub trait KeyDecoder {
    /// Read and decode exactly one key.
    ///
    /// Raw mode is held for the duration of this call only. `Ok(None)`
    /// means the bytes read did not form a recognized key.
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>>;
}

impl<D: KeyDecoder + ?Sized> KeyDecoder for &mut D {
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>> {
        (**self).decode_one_event()
    }
}

impl<D: KeyDecoder + ?Sized> KeyDecoder for Box<D> {
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>> {
        (**self).decode_one_event()
    }
}

/// Shared decoder for nested menus: borrowed only for one event, so an
/// action may run its own menu on the same decoder.
impl<D: KeyDecoder + ?Sized> KeyDecoder for &RefCell<D> {
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>> {
        self.borrow_mut().decode_one_event()
    }
}

// ============================================================================
// PLATFORM SELECTION
// ============================================================================

/// Decoder for the terminal this binary was built for.
#[cfg(unix)]
pub fn platform_decoder() -> io::Result<Box<dyn KeyDecoder>> {
    Ok(Box::new(AnsiDecoder::new(tty::TtySource::stdin()?)))
}

/// Decoder for the terminal this binary was built for.
#[cfg(windows)]
pub fn platform_decoder() -> io::Result<Box<dyn KeyDecoder>> {
    Ok(Box::new(ConioDecoder::new(crt::CrtSource)))
}
