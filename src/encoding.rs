//! Bit-to-symbol expansion for the optical frame.
//!
//! Every checksum and payload bit is sent as two symbols:
//!
//! | Bit | Symbols  |
//! |-----|----------|
//! | `0` | `(0, 1)` |
//! | `1` | `(1, 0)` |
//!
//! ## Purpose
//!
//! This is a constant-weight, self-clocking code. Each encoded bit carries exactly
//! one `0` and one `1`, so the LED is never dark or lit for more than two slots
//! in a row inside the data section, and a receiver can track slot boundaries
//! from the transitions alone. The preamble is *not* expanded: its `1,1` and
//! `0,0` runs sit inside symbol pairs, where a valid expansion never has them.
//!
//! ## Functions
//!
//! - [`expand_bit`]: one bit to its symbol pair
//! - [`collapse_pair`]: a symbol pair back to its bit
//! - [`expand_buffer`]: a bit slice into a symbol slice
//! - [`collapse_buffer`]: a symbol slice back into bits
//!
//! ## Limitations
//!
//! - `(0, 0)` and `(1, 1)` are not valid pairs; collapsing them returns `None`
//! - Input to [`collapse_buffer`] must be even-length

/// Symbol pairs indexed by bit value.
static SYMBOLS: [[u8; 2]; 2] = [[0, 1], [1, 0]];

/// Expands a single bit into its two-symbol representation.
///
/// Only the lowest bit of `bit` is considered.
pub fn expand_bit(bit: u8) -> [u8; 2] {
    SYMBOLS[(bit & 1) as usize]
}

/// Recovers a bit from its two-symbol representation.
///
/// Returns `None` if the pair is not a valid expansion.
pub fn collapse_pair(first: u8, second: u8) -> Option<u8> {
    match (first, second) {
        (0, 1) => Some(0),
        (1, 0) => Some(1),
        _ => None,
    }
}

/// Expands every bit of `input` into `output` as symbol pairs.
///
/// # Arguments
/// - `&[u8]` : The input bits
/// - `&mut [u8]` : The output buffer, at least twice as long as `input`
///
/// # Returns
/// The number of symbols written
pub fn expand_buffer(input: &[u8], output: &mut [u8]) -> usize {
    let mut i = 0;
    for &bit in input {
        let [first, second] = expand_bit(bit);
        output[i] = first;
        output[i + 1] = second;
        i += 2;
    }
    i
}

/// Collapses symbol pairs from `input` back into bits in `output`.
///
/// # Arguments
/// - `&[u8]` : The input symbols
/// - `&mut [u8]` : The output buffer, at least half as long as `input`
///
/// # Returns
/// The number of bits written, or `None` if `input` has an odd length or
/// contains an invalid pair.
pub fn collapse_buffer(input: &[u8], output: &mut [u8]) -> Option<usize> {
    if input.len() % 2 != 0 {
        return None;
    }
    let mut i = 0;
    for pair in input.chunks_exact(2) {
        output[i] = collapse_pair(pair[0], pair[1])?;
        i += 1;
    }
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_table() {
        assert_eq!(expand_bit(0), [0, 1]);
        assert_eq!(expand_bit(1), [1, 0]);
    }

    #[test]
    fn test_invalid_pairs_do_not_collapse() {
        assert_eq!(collapse_pair(0, 0), None);
        assert_eq!(collapse_pair(1, 1), None);
        assert_eq!(collapse_pair(2, 0), None);
    }

    #[test]
    fn test_expanded_bits_are_constant_weight() {
        let bits = [1, 1, 1, 0, 0, 0, 1, 0];
        let mut symbols = [0u8; 16];
        assert_eq!(expand_buffer(&bits, &mut symbols), 16);
        for pair in symbols.chunks(2) {
            assert_eq!(pair[0] + pair[1], 1);
        }
        assert_eq!(symbols.iter().filter(|&&s| s == 1).count(), bits.len());
    }

    #[test]
    fn test_collapse_recovers_bits() {
        let bits = [0, 1, 1, 0, 1];
        let mut symbols = [0u8; 10];
        let written = expand_buffer(&bits, &mut symbols);
        let mut decoded = [0u8; 5];
        assert_eq!(collapse_buffer(&symbols[..written], &mut decoded), Some(5));
        assert_eq!(decoded, bits);
    }

    #[test]
    fn test_collapse_rejects_odd_length() {
        let mut out = [0u8; 2];
        assert_eq!(collapse_buffer(&[0, 1, 1], &mut out), None);
    }

    #[test]
    fn test_collapse_rejects_bad_pair() {
        let mut out = [0u8; 2];
        assert_eq!(collapse_buffer(&[0, 1, 1, 1], &mut out), None);
    }
}
