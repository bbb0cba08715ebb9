//! Key decoding for the Windows console.
//!
//! The console reports arrow keys as a prefix byte (0xE0, or 0x00 on the
//! numeric keypad) followed by a scan code. ESC is never a prefix here,
//! so it always means Cancel and no look-ahead is needed.

use std::io;

use log::trace;

use super::{ByteSource, KeyDecoder};
use crate::types::LogicalKey;

// ============================================================================
// BYTE CONSTANTS
// ============================================================================

pub const ESC: u8 = 0x1B;
pub const CARRIAGE_RETURN: u8 = 0x0D;
pub const SPACE: u8 = 0x20;
/// Ctrl-C as `_getch` reports it.
pub const END_OF_TEXT: u8 = 0x03;

/// Prefix for extended keys on the main cluster.
pub const EXTENDED_PREFIX: u8 = 0xE0;
/// Prefix for extended keys on the numeric keypad.
pub const KEYPAD_PREFIX: u8 = 0x00;

pub const SCAN_UP: u8 = 0x48;
pub const SCAN_DOWN: u8 = 0x50;
pub const SCAN_LEFT: u8 = 0x4B;
pub const SCAN_RIGHT: u8 = 0x4D;

// ============================================================================
// DECODER
// ============================================================================

/// [`KeyDecoder`] for the Windows console.
pub struct ConioDecoder<S: ByteSource> {
    source: S,
}

impl<S: ByteSource> ConioDecoder<S> {
    pub fn new(source: S) -> Self {
        ConioDecoder { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> KeyDecoder for ConioDecoder<S> {
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>> {
        let _raw = self.source.enter_raw_mode()?;
        let key = decode(&mut self.source)?;
        trace!("conio decode -> {key:?}");
        Ok(key)
    }
}

/// Decode one key from `source`.
pub fn decode<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Option<LogicalKey>> {
    let first = source.read_byte()?;
    match first {
        EXTENDED_PREFIX | KEYPAD_PREFIX => {
            let scan = source.read_byte()?;
            Ok(arrow(scan))
        }
        CARRIAGE_RETURN | SPACE => Ok(Some(LogicalKey::Confirm)),
        ESC | END_OF_TEXT => Ok(Some(LogicalKey::Cancel)),
        other => {
            trace!("conio: ignored byte {other:#04x}");
            Ok(None)
        }
    }
}

fn arrow(scan: u8) -> Option<LogicalKey> {
    match scan {
        SCAN_UP => Some(LogicalKey::Up),
        SCAN_DOWN => Some(LogicalKey::Down),
        SCAN_LEFT => Some(LogicalKey::Left),
        SCAN_RIGHT => Some(LogicalKey::Right),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================
