//! Internet checksum (RFC 1071).
//!
//! One's-complement sum of 16-bit words with end-around carry, followed by
//! a final complement. These functions know nothing about packet layout;
//! callers hand them the words in the order they must be summed.

use log::trace;

use crate::PacketError;

/// Value of the bit that overflows a 16-bit accumulator.
const CARRY: u32 = 0x1_0000;

/// Adds `word` to `acc`, folding any carry back into the low bits.
pub fn add_with_carry(acc: u16, word: u16) -> u16 {
    let mut sum = acc as u32 + word as u32;
    while sum >= CARRY {
        sum -= CARRY;
        sum += 1;
    }
    sum as u16
}

/// Folds `words` into a single 16-bit one's-complement sum.
///
/// The accumulator starts at the first word, so an empty slice has no
/// defined sum.
///
/// # Returns
/// - `Ok(u16)` - The folded sum, before complement
/// - `Err(PacketError::EmptyOperands)` - If `words` is empty
pub fn fold_sum(words: &[u16]) -> Result<u16, PacketError> {
    let (first, rest) = words.split_first().ok_or(PacketError::EmptyOperands)?;
    Ok(rest.iter().fold(*first, |acc, &word| {
        let sum = add_with_carry(acc, word);
        trace!("{:#06x} + {:#06x} -> {:#06x}", acc, word, sum);
        sum
    }))
}

/// Combines sums that were folded over separate groups of words.
///
/// The result equals [`fold_sum`] over the concatenated groups.
pub fn combine(partials: &[u16]) -> Result<u16, PacketError> {
    fold_sum(partials)
}

/// One's-complement of a folded sum.
pub fn ones_complement(sum: u16) -> u16 {
    0xFFFF - sum
}

/// Computes the Internet checksum of `words`.
pub fn checksum(words: &[u16]) -> Result<u16, PacketError> {
    fold_sum(words).map(ones_complement)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Words fed to the checksum for the built-in sample datagram.
    const SAMPLE_OPERANDS: [u16; 15] = [
        0x0011, 0xa9fe, 0x01e9, 0xa9fe, 0x01ff, 0x0014, 0xc727, 0x1388, 0x0014, 0x434d, 0x4400,
        0x0000, 0x001b, 0xa9fe, 0x01ff,
    ];

    fn pseudo_random_words(seed: u32, len: usize) -> Vec<u16> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 8) as u16
            })
            .collect()
    }

    #[test]
    fn test_single_word() {
        assert_eq!(checksum(&[0x1234]).unwrap(), 0xFFFF - 0x1234);
        assert_eq!(checksum(&[0x0000]).unwrap(), 0xFFFF);
        assert_eq!(checksum(&[0xFFFF]).unwrap(), 0x0000);
    }

    #[test]
    fn test_carry_fold() {
        assert_eq!(add_with_carry(0xFFFF, 0xFFFF), 0xFFFF);
        assert_eq!(add_with_carry(0x8000, 0x8000), 0x0001);
        assert_eq!(fold_sum(&[0xFFFF, 0xFFFF]).unwrap(), 0xFFFF);
        assert_eq!(checksum(&[0xFFFF, 0xFFFF]).unwrap(), 0x0000);
    }

    #[test]
    fn test_empty_operands() {
        assert!(matches!(fold_sum(&[]), Err(PacketError::EmptyOperands)));
        assert!(matches!(checksum(&[]), Err(PacketError::EmptyOperands)));
        assert!(matches!(combine(&[]), Err(PacketError::EmptyOperands)));
    }

    #[test]
    fn test_sample_checksum() {
        assert_eq!(checksum(&SAMPLE_OPERANDS).unwrap(), 0x99cb);
    }

    #[test]
    fn test_matches_upper_half_folding() {
        for seed in 1..20 {
            let words = pseudo_random_words(seed, 64);
            let mut wide: u32 = words.iter().map(|&w| w as u32).sum();
            while (wide >> 16) > 0 {
                wide = (wide & 0xFFFF) + (wide >> 16);
            }
            assert_eq!(fold_sum(&words).unwrap(), wide as u16, "seed {}", seed);
        }
    }

    #[test]
    fn test_grouping_invariance() {
        let words = pseudo_random_words(7, 40);
        let whole = fold_sum(&words).unwrap();

        for split in [1, 2, 3, 5, 8, 13, 39] {
            let partials: Vec<u16> = words
                .chunks(split)
                .map(|group| fold_sum(group).unwrap())
                .collect();
            assert_eq!(combine(&partials).unwrap(), whole, "groups of {}", split);
        }

        let mut reversed = words.clone();
        reversed.reverse();
        assert_eq!(fold_sum(&reversed).unwrap(), whole);

        // Uneven grouping, with an all-zero group in the middle.
        let mut padded = words[..10].to_vec();
        padded.extend_from_slice(&[0, 0, 0]);
        padded.extend_from_slice(&words[10..]);
        let partials = [
            fold_sum(&padded[..10]).unwrap(),
            fold_sum(&padded[10..13]).unwrap(),
            fold_sum(&padded[13..]).unwrap(),
        ];
        assert_eq!(combine(&partials).unwrap(), whole);
    }

    #[test]
    fn test_checksum_round_trip() {
        let result = checksum(&SAMPLE_OPERANDS).unwrap();

        let mut with_checksum = SAMPLE_OPERANDS.to_vec();
        with_checksum.push(result);
        assert_eq!(fold_sum(&with_checksum).unwrap(), 0xFFFF);
        assert_eq!(checksum(&with_checksum).unwrap(), 0x0000);

        for seed in 1..10 {
            let mut words = pseudo_random_words(seed, 21);
            words[3] = 0;
            let result = checksum(&words).unwrap();
            words[3] = result;
            assert_eq!(checksum(&words).unwrap(), 0x0000, "seed {}", seed);
        }
    }
}
