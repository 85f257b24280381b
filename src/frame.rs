//! Payload validation and frame encoding.
//!
//! A [`Frame`] is the full on-air symbol sequence:
//!
//! ```text
//! | preamble (10, raw) | checksum (2 bits -> 4) | payload (16 bits -> 32) |
//! ```
//!
//! The sequence is computed once, when the frame is built, and stored flat so
//! that [`Frame::symbol_at`] is a single array index. The player polls it on
//! every tick.

use crate::checksum::xor_fold;
use crate::consts::{DATA_LEN, DEFAULT_PAYLOAD, FRAME_LEN, HASH_LEN, HEADER_LEN, PREAMBLE};
use crate::encoding::{collapse_buffer, expand_buffer};
use crate::error::{Error, Result};

const HASH_START: usize = HEADER_LEN;
const DATA_START: usize = HASH_START + HASH_LEN * 2;

/// Sixteen payload bits, each 0 or 1.
///
/// Immutable once built; a new payload means a new [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Payload {
    bits: [u8; DATA_LEN],
}

impl Payload {
    /// Builds a payload from a slice of bits.
    ///
    /// # Errors
    /// - [`Error::PayloadLength`] if `bits` is not [`DATA_LEN`] long
    /// - [`Error::InvalidBit`] if any element is not 0 or 1
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.len() != DATA_LEN {
            return Err(Error::PayloadLength {
                expected: DATA_LEN,
                actual: bits.len(),
            });
        }
        if let Some((index, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(Error::InvalidBit { index, value });
        }
        let mut out = [0u8; DATA_LEN];
        out.copy_from_slice(bits);
        Ok(Self { bits: out })
    }

    /// Builds a payload from a 16-bit word, most significant bit first.
    pub const fn from_u16(word: u16) -> Self {
        let mut bits = [0u8; DATA_LEN];
        let mut i = 0;
        while i < DATA_LEN {
            bits[i] = ((word >> (DATA_LEN - 1 - i)) & 1) as u8;
            i += 1;
        }
        Self { bits }
    }

    /// Packs the payload into a 16-bit word, most significant bit first.
    pub fn to_u16(&self) -> u16 {
        self.bits
            .iter()
            .fold(0u16, |word, &bit| (word << 1) | u16::from(bit))
    }

    /// The payload bits.
    pub fn bits(&self) -> &[u8; DATA_LEN] {
        &self.bits
    }

    /// The two-bit XOR-fold checksum of this payload.
    pub fn checksum(&self) -> [u8; HASH_LEN] {
        xor_fold(&self.bits)
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            bits: DEFAULT_PAYLOAD,
        }
    }
}

impl From<u16> for Payload {
    fn from(word: u16) -> Self {
        Self::from_u16(word)
    }
}

impl TryFrom<&[u8]> for Payload {
    type Error = Error;

    fn try_from(bits: &[u8]) -> Result<Self> {
        Self::from_bits(bits)
    }
}

/// A fully encoded, ready-to-transmit symbol sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Frame {
    payload: Payload,
    symbols: [u8; FRAME_LEN],
}

impl Frame {
    /// Encodes `payload` into preamble, expanded checksum and expanded payload.
    pub fn encode(payload: Payload) -> Self {
        let mut symbols = [0u8; FRAME_LEN];
        symbols[..HEADER_LEN].copy_from_slice(&PREAMBLE);
        let hash_len = expand_buffer(&payload.checksum(), &mut symbols[HASH_START..DATA_START]);
        let data_len = expand_buffer(payload.bits(), &mut symbols[DATA_START..]);
        debug_assert_eq!(HEADER_LEN + hash_len + data_len, FRAME_LEN);
        Self { payload, symbols }
    }

    /// Validates `bits` and encodes them.
    ///
    /// # Errors
    /// See [`Payload::from_bits`].
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        Payload::from_bits(bits).map(Self::encode)
    }

    /// The symbol on air at `index`.
    ///
    /// # Panics
    /// If `index >= FRAME_LEN`. Validated patterns never produce such an index.
    #[inline]
    pub fn symbol_at(&self, index: usize) -> u8 {
        self.symbols[index]
    }

    /// The full symbol sequence.
    pub fn symbols(&self) -> &[u8; FRAME_LEN] {
        &self.symbols
    }

    /// The payload this frame was encoded from.
    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// Number of symbols in a frame. Always [`FRAME_LEN`].
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        FRAME_LEN
    }

    /// Recovers the payload from a received symbol sequence.
    ///
    /// # Errors
    /// - [`Error::FrameLength`] if `symbols` is not [`FRAME_LEN`] long
    /// - [`Error::PreambleMismatch`] if it does not start with [`PREAMBLE`]
    /// - [`Error::InvalidSymbolPair`] for a `(0, 0)` or `(1, 1)` pair
    /// - [`Error::ChecksumMismatch`] if the carried checksum is wrong
    pub fn decode(symbols: &[u8]) -> Result<Payload> {
        if symbols.len() != FRAME_LEN {
            return Err(Error::FrameLength {
                expected: FRAME_LEN,
                actual: symbols.len(),
            });
        }
        if symbols[..HEADER_LEN] != PREAMBLE {
            return Err(Error::PreambleMismatch);
        }

        let mut carried = [0u8; HASH_LEN];
        let _ = collapse_buffer(&symbols[HASH_START..DATA_START], &mut carried)
            .ok_or_else(|| invalid_pair_in(symbols, HASH_START))?;
        let mut bits = [0u8; DATA_LEN];
        let _ = collapse_buffer(&symbols[DATA_START..], &mut bits)
            .ok_or_else(|| invalid_pair_in(symbols, DATA_START))?;

        let payload = Payload { bits };
        let expected = payload.checksum();
        if expected != carried {
            return Err(Error::ChecksumMismatch {
                expected,
                actual: carried,
            });
        }
        Ok(payload)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::encode(Payload::default())
    }
}

impl From<Payload> for Frame {
    fn from(payload: Payload) -> Self {
        Self::encode(payload)
    }
}

fn invalid_pair_in(symbols: &[u8], start: usize) -> Error {
    let index = symbols[start..]
        .chunks_exact(2)
        .position(|pair| pair[0] == pair[1])
        .map_or(start, |pair| start + pair * 2);
    Error::InvalidSymbolPair { index }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_payloads() -> impl Iterator<Item = Payload> {
        (0..=u16::MAX).map(Payload::from_u16)
    }

    #[test]
    fn test_payload_rejects_wrong_length() {
        assert_eq!(
            Payload::from_bits(&[0, 1, 1]),
            Err(Error::PayloadLength {
                expected: 16,
                actual: 3
            })
        );
        assert!(Payload::from_bits(&[0; 17]).is_err());
    }

    #[test]
    fn test_payload_rejects_non_binary() {
        let mut bits = [0u8; 16];
        bits[5] = 2;
        assert_eq!(
            Payload::from_bits(&bits),
            Err(Error::InvalidBit { index: 5, value: 2 })
        );
    }

    #[test]
    fn test_payload_word_order() {
        let payload = Payload::from_u16(0x8001);
        assert_eq!(payload.bits()[0], 1);
        assert_eq!(payload.bits()[15], 1);
        assert_eq!(payload.bits()[1..15].iter().sum::<u8>(), 0);
        assert_eq!(payload.to_u16(), 0x8001);
        assert_eq!(Payload::default().to_u16(), 0b0110_1001_0101_0011);
    }

    #[test]
    fn test_default_frame_symbols() {
        let frame = Frame::default();
        assert_eq!(
            frame.symbols(),
            &[
                0, 1, 1, 0, 1, 1, 0, 0, 1, 0, // preamble
                1, 0, 1, 0, // checksum [1, 1]
                0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0, // payload 0110 1001
                0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0, 1, 0, // payload 0101 0011
            ]
        );
    }

    #[test]
    fn test_frame_length_and_preamble_for_every_payload() {
        for payload in all_payloads() {
            let frame = Frame::encode(payload);
            assert_eq!(frame.symbols().len(), 46);
            assert_eq!(frame.symbols()[..10], PREAMBLE);
        }
    }

    #[test]
    fn test_expansion_round_trip_for_every_payload() {
        for payload in all_payloads() {
            let frame = Frame::encode(payload);
            let symbols = frame.symbols();
            for (i, &bit) in payload.checksum().iter().enumerate() {
                let pair = (symbols[10 + 2 * i], symbols[11 + 2 * i]);
                assert_eq!(pair, if bit == 0 { (0, 1) } else { (1, 0) });
            }
            assert_eq!(Frame::decode(symbols), Ok(payload));
        }
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert_eq!(
            Frame::decode(&PREAMBLE),
            Err(Error::FrameLength {
                expected: 46,
                actual: 10
            })
        );
    }

    #[test]
    fn test_decode_rejects_bad_preamble() {
        let mut symbols = *Frame::default().symbols();
        symbols[0] = 1;
        assert_eq!(Frame::decode(&symbols), Err(Error::PreambleMismatch));
    }

    #[test]
    fn test_decode_reports_invalid_pair_position() {
        let mut symbols = *Frame::default().symbols();
        symbols[20] = symbols[21];
        assert_eq!(
            Frame::decode(&symbols),
            Err(Error::InvalidSymbolPair { index: 20 })
        );
        let mut symbols = *Frame::default().symbols();
        symbols[12] = symbols[13];
        assert_eq!(
            Frame::decode(&symbols),
            Err(Error::InvalidSymbolPair { index: 12 })
        );
    }

    #[test]
    fn test_decode_detects_single_bit_flip() {
        let mut symbols = *Frame::default().symbols();
        // flip payload bit 0 by swapping its pair
        symbols.swap(14, 15);
        assert_eq!(
            Frame::decode(&symbols),
            Err(Error::ChecksumMismatch {
                expected: [0, 1],
                actual: [1, 1]
            })
        );
    }
}
