use rand_core::{OsRng, RngCore};

use crate::error::WipeError;

/// A single overwrite pass: either a fixed repeating byte value or a
/// marker for freshly generated random data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErasePattern {
    /// Repeat the given byte across the whole range.
    Fixed(u8),
    /// Generate fresh cryptographically secure random bytes per block.
    Random,
}

/// An ordered list of erase patterns applied to one file, one pass per
/// entry. Order is significant: passes run sequentially and are never
/// reordered or parallelized within a file.
pub type PassSequence = &'static [ErasePattern];

/// DoD 5220.22-M sequence: zero fill, one fill, random.
pub const DOD_PASSES: PassSequence = &[
    ErasePattern::Fixed(0x00),
    ErasePattern::Fixed(0xFF),
    ErasePattern::Random,
];

/// Simplified Gutmann-style sequence of alternating bit patterns.
pub const GUTMANN_PASSES: PassSequence = &[
    ErasePattern::Fixed(0x55), // 01010101
    ErasePattern::Fixed(0xAA), // 10101010
    ErasePattern::Fixed(0x92), // 10010010
    ErasePattern::Fixed(0x49), // 01001001
    ErasePattern::Fixed(0x00),
    ErasePattern::Fixed(0xFF),
    ErasePattern::Random,
];

/// Standalone random pass applied after both standard sequences.
pub const FINAL_PASS: ErasePattern = ErasePattern::Random;

impl ErasePattern {
    /// Fill `buf` with this pattern's data.
    ///
    /// Fails with [`WipeError::RngUnavailable`] if the pattern is
    /// [`ErasePattern::Random`] and the entropy source cannot be read.
    pub fn fill(&self, buf: &mut [u8]) -> Result<(), WipeError> {
        match self {
            ErasePattern::Fixed(byte) => buf.fill(*byte),
            ErasePattern::Random => fill_random(buf)?,
        }
        Ok(())
    }
}

/// Fill `buf` with cryptographically secure random bytes.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), WipeError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|source| WipeError::RngUnavailable { source })
}

/// Produce `len` cryptographically secure random bytes.
pub fn random_block(len: usize) -> Result<Vec<u8>, WipeError> {
    let mut block = vec![0u8; len];
    fill_random(&mut block)?;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dod_sequence_is_zero_one_random() {
        assert_eq!(
            DOD_PASSES,
            &[
                ErasePattern::Fixed(0x00),
                ErasePattern::Fixed(0xFF),
                ErasePattern::Random,
            ]
        );
    }

    #[test]
    fn gutmann_sequence_has_seven_passes_ending_random() {
        assert_eq!(GUTMANN_PASSES.len(), 7);
        assert_eq!(GUTMANN_PASSES[0], ErasePattern::Fixed(0x55));
        assert_eq!(GUTMANN_PASSES[6], ErasePattern::Random);
    }

    #[test]
    fn fixed_pattern_fills_buffer() {
        let mut buf = vec![0u8; 1024];
        ErasePattern::Fixed(0xAA).fill(&mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn random_pattern_produces_fresh_data() {
        let mut a = vec![0u8; 256];
        let mut b = vec![0u8; 256];
        ErasePattern::Random.fill(&mut a).unwrap();
        ErasePattern::Random.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn random_block_has_requested_length() {
        let block = random_block(4096).unwrap();
        assert_eq!(block.len(), 4096);
    }
}
