//! Two-bit XOR checksum over the payload.
//!
//! Computed once per frame; there is no incremental update.

use crate::consts::HASH_LEN;

/// Folds a bit sequence pairwise into a two-bit checksum.
///
/// `checksum[0]` is the XOR of every even-indexed bit and `checksum[1]` the XOR
/// of every odd-indexed bit. A trailing unpaired bit is folded into `checksum[0]`.
pub fn xor_fold(bits: &[u8]) -> [u8; HASH_LEN] {
    let mut hash = [0u8; HASH_LEN];
    for pair in bits.chunks(2) {
        hash[0] ^= pair[0] & 1;
        if let Some(odd) = pair.get(1) {
            hash[1] ^= odd & 1;
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_folds_to_zero() {
        assert_eq!(xor_fold(&[]), [0, 0]);
    }

    #[test]
    fn test_even_and_odd_bits_fold_separately() {
        assert_eq!(xor_fold(&[1, 0, 1, 0]), [0, 0]);
        assert_eq!(xor_fold(&[1, 0, 0, 0]), [1, 0]);
        assert_eq!(xor_fold(&[0, 1, 0, 0]), [0, 1]);
        assert_eq!(xor_fold(&[1, 1, 0, 1]), [1, 0]);
    }

    #[test]
    fn test_default_payload_checksum() {
        use crate::consts::DEFAULT_PAYLOAD;
        // even: 0,1,1,0,0,0,0,1 -> 1; odd: 1,0,0,1,1,1,0,1 -> 1
        assert_eq!(xor_fold(&DEFAULT_PAYLOAD), [1, 1]);
    }

    #[test]
    fn test_every_16_bit_payload() {
        for word in 0..=u16::MAX {
            let mut bits = [0u8; 16];
            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = ((word >> (15 - i)) & 1) as u8;
            }
            let even = bits.iter().step_by(2).fold(0, |acc, b| acc ^ b);
            let odd = bits.iter().skip(1).step_by(2).fold(0, |acc, b| acc ^ b);
            assert_eq!(xor_fold(&bits), [even, odd]);
        }
    }
}
