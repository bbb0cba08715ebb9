//! Key decoding for unix terminals.
//!
//! Arrow keys arrive as three-byte sequences: ESC, an introducer (`[` for
//! CSI, `O` for SS3 in application-cursor mode) and a final byte. A lone
//! ESC press is told apart from a sequence start by checking whether more
//! bytes are already buffered right after the ESC.

use std::io;

use log::trace;

use super::{ByteSource, KeyDecoder};
use crate::types::LogicalKey;

// ============================================================================
// BYTE CONSTANTS
// ============================================================================

pub const ESC: u8 = 0x1B;
pub const LINE_FEED: u8 = 0x0A;
pub const CARRIAGE_RETURN: u8 = 0x0D;
pub const SPACE: u8 = 0x20;
/// Ctrl-C with signal generation off.
pub const END_OF_TEXT: u8 = 0x03;

/// Second byte of a CSI sequence.
pub const CSI_INTRODUCER: u8 = b'[';
/// Second byte of an SS3 sequence.
pub const SS3_INTRODUCER: u8 = b'O';

// ============================================================================
// DECODER
// ============================================================================

/// [`KeyDecoder`] for ANSI terminals.
pub struct AnsiDecoder<S: ByteSource> {
    source: S,
}

impl<S: ByteSource> AnsiDecoder<S> {
    pub fn new(source: S) -> Self {
        AnsiDecoder { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> KeyDecoder for AnsiDecoder<S> {
    fn decode_one_event(&mut self) -> io::Result<Option<LogicalKey>> {
        let _raw = self.source.enter_raw_mode()?;
        let key = decode(&mut self.source)?;
        trace!("ansi decode -> {key:?}");
        Ok(key)
    }
}

/// Decode one key from `source`. Assumes raw mode is already held.
pub fn decode<S: ByteSource + ?Sized>(source: &mut S) -> io::Result<Option<LogicalKey>> {
    let first = source.read_byte()?;
    match first {
        LINE_FEED | CARRIAGE_RETURN | SPACE => Ok(Some(LogicalKey::Confirm)),
        END_OF_TEXT => Ok(Some(LogicalKey::Cancel)),
        ESC => {
            if !source.has_pending()? {
                return Ok(Some(LogicalKey::Cancel));
            }
            let introducer = source.read_byte()?;
            if introducer != CSI_INTRODUCER && introducer != SS3_INTRODUCER {
                trace!("ansi: unknown introducer {introducer:#04x}");
                return Ok(None);
            }
            let last = source.read_byte()?;
            Ok(arrow(last))
        }
        other => {
            trace!("ansi: ignored byte {other:#04x}");
            Ok(None)
        }
    }
}

/// Map the final byte of an arrow sequence.
fn arrow(byte: u8) -> Option<LogicalKey> {
    match byte {
        b'A' => Some(LogicalKey::Up),
        b'B' => Some(LogicalKey::Down),
        b'C' => Some(LogicalKey::Right),
        b'D' => Some(LogicalKey::Left),
        _ => None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;

    fn decode_bytes(bytes: &[u8]) -> Option<LogicalKey> {
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(bytes));
        decoder.decode_one_event().unwrap()
    }

    #[test]
    fn arrow_sequences_map_to_moves() {
        assert_eq!(decode_bytes(b"\x1b[A"), Some(LogicalKey::Up));
        assert_eq!(decode_bytes(b"\x1b[B"), Some(LogicalKey::Down));
        assert_eq!(decode_bytes(b"\x1b[C"), Some(LogicalKey::Right));
        assert_eq!(decode_bytes(b"\x1b[D"), Some(LogicalKey::Left));
    }

    #[test]
    fn application_mode_arrows_decode_the_same() {
        assert_eq!(decode_bytes(b"\x1bOA"), Some(LogicalKey::Up));
        assert_eq!(decode_bytes(b"\x1bOB"), Some(LogicalKey::Down));
    }

    #[test]
    fn lone_escape_is_cancel() {
        assert_eq!(decode_bytes(&[ESC]), Some(LogicalKey::Cancel));
    }

    #[test]
    fn line_feed_return_and_space_confirm() {
        assert_eq!(decode_bytes(&[LINE_FEED]), Some(LogicalKey::Confirm));
        assert_eq!(decode_bytes(&[CARRIAGE_RETURN]), Some(LogicalKey::Confirm));
        assert_eq!(decode_bytes(&[SPACE]), Some(LogicalKey::Confirm));
    }

    #[test]
    fn ctrl_c_is_cancel() {
        let mut decoder = AnsiDecoder::new(ScriptedSource::keystrokes(&[&[END_OF_TEXT], b"\x1b[B"]));
        assert_eq!(decoder.decode_one_event().unwrap(), Some(LogicalKey::Cancel));
        assert_eq!(decoder.decode_one_event().unwrap(), Some(LogicalKey::Down));
    }

    #[test]
    fn plain_letters_are_ignored() {
        assert_eq!(decode_bytes(b"q"), None);
        assert_eq!(decode_bytes(b"j"), None);
    }

    #[test]
    fn unknown_final_byte_is_ignored() {
        // Home key: ESC [ H
        assert_eq!(decode_bytes(b"\x1b[H"), None);
    }

    #[test]
    fn unknown_introducer_consumes_only_itself() {
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(b"\x1bxA"));
        assert_eq!(decoder.decode_one_event().unwrap(), None);
        assert_eq!(decoder.into_inner().remaining(), b"A");
    }

    #[test]
    fn sequence_consumes_exactly_three_bytes() {
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(b"\x1b[B\n"));
        assert_eq!(decoder.decode_one_event().unwrap(), Some(LogicalKey::Down));
        assert_eq!(decoder.decode_one_event().unwrap(), Some(LogicalKey::Confirm));
    }

    #[test]
    fn raw_mode_is_released_after_each_decode() {
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(b"\x1b[A "));
        decoder.decode_one_event().unwrap();
        decoder.decode_one_event().unwrap();
        let source = decoder.into_inner();
        assert_eq!(source.raw_depth(), 0);
        assert_eq!(source.max_raw_depth(), 1);
        assert_eq!(source.raw_entries(), 2);
    }

    #[test]
    fn raw_mode_is_released_when_input_ends() {
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(b""));
        let err = decoder.decode_one_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(decoder.into_inner().raw_depth(), 0);
    }

    #[test]
    fn truncated_sequence_reports_eof_and_restores_mode() {
        // ESC [ with the final byte missing: pending was true, then input ends.
        let mut decoder = AnsiDecoder::new(ScriptedSource::new(b"\x1b["));
        assert!(decoder.decode_one_event().is_err());
        assert_eq!(decoder.into_inner().raw_depth(), 0);
    }
}
