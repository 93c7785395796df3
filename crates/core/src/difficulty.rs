//! Difficulty model
//!
//! Difficulty is a count of leading zero bits, read MSB-first across the
//! digest bytes. The hex-digit convention (difficulty 12 = three leading
//! `0` hex digits) is only a presentation of the same bit count; the
//! predicate always works on bits, so non-multiples of 4 are exact.

use core::fmt;

use crate::params::HEX_DIGIT_BITS;

/// Required leading zero bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Difficulty(u32);

impl Difficulty {
    pub const ZERO: Difficulty = Difficulty(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Difficulty expressed as leading zero hex digits (4 bits each)
    pub const fn from_hex_digits(digits: u32) -> Self {
        Self(digits.saturating_mul(HEX_DIGIT_BITS))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whole hex digits covered (`bits / 4`, rounded down)
    pub const fn hex_digits(self) -> u32 {
        self.0 / HEX_DIGIT_BITS
    }

    /// Whether a digest of `digest_len` bytes can satisfy this difficulty at all
    pub const fn is_reachable(self, digest_len: usize) -> bool {
        (self.0 as u64) <= (digest_len as u64) * 8
    }

    #[inline(always)]
    pub fn is_satisfied_by(self, digest: &[u8]) -> bool {
        meets_difficulty(digest, self.0)
    }
}

impl From<u32> for Difficulty {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

/// Count leading zero bits of a digest
pub fn leading_zero_bits(digest: &[u8]) -> u32 {
    let mut zero_bits = 0u32;

    for byte in digest.iter() {
        if *byte == 0 {
            zero_bits += 8;
        } else {
            zero_bits += byte.leading_zeros();
            break;
        }
    }

    zero_bits
}

/// Check if a digest meets the required difficulty
///
/// Difficulty is measured as the number of leading zero bits required.
/// Difficulty 0 accepts every digest; a difficulty wider than the digest
/// accepts none.
///
/// # Example
///
/// ```rust
/// use multipow_core::meets_difficulty;
///
/// // 0x00, 0x0F = 8 + 4 leading zero bits
/// let digest = [0x00, 0x0F, 0xFF, 0xFF];
/// assert!(meets_difficulty(&digest, 12));
/// assert!(!meets_difficulty(&digest, 13));
/// ```
#[inline(always)]
pub fn meets_difficulty(digest: &[u8], difficulty: u32) -> bool {
    let full_bytes = (difficulty / 8) as usize;
    let rem_bits = difficulty % 8;

    if full_bytes > digest.len() || (full_bytes == digest.len() && rem_bits > 0) {
        return false;
    }
    if digest[..full_bytes].iter().any(|&b| b != 0) {
        return false;
    }

    rem_bits == 0 || digest[full_bytes].leading_zeros() >= rem_bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_check() {
        // 8 leading zero bits
        let hash_8_zeros = [0x00, 0xFF, 0xFF, 0xFF];
        assert!(meets_difficulty(&hash_8_zeros, 8));
        assert!(!meets_difficulty(&hash_8_zeros, 9));

        // 16 leading zero bits
        let hash_16_zeros = [0x00, 0x00, 0xFF, 0xFF];
        assert!(meets_difficulty(&hash_16_zeros, 16));
        assert!(!meets_difficulty(&hash_16_zeros, 17));

        // leading 0x0F
        let hash_4_zeros = [0x0F, 0xFF, 0xFF, 0xFF];
        assert!(meets_difficulty(&hash_4_zeros, 4));
        assert!(!meets_difficulty(&hash_4_zeros, 5));
    }

    #[test]
    fn test_non_nibble_difficulty() {
        // 0x1F has 3 leading zero bits; a nibble check would round this wrong
        let digest = [0x1F, 0x00];
        assert!(meets_difficulty(&digest, 3));
        assert!(!meets_difficulty(&digest, 4));

        let digest = [0x00, 0x20];
        assert!(meets_difficulty(&digest, 10));
        assert!(!meets_difficulty(&digest, 11));
    }

    #[test]
    fn test_zero_difficulty_accepts_everything() {
        assert!(meets_difficulty(&[0xFF; 16], 0));
        assert!(meets_difficulty(&[], 0));
    }

    #[test]
    fn test_difficulty_wider_than_digest() {
        let zeros = [0u8; 16];
        assert!(meets_difficulty(&zeros, 128));
        assert!(!meets_difficulty(&zeros, 129));
        assert!(!meets_difficulty(&zeros, 1000));
        assert!(!meets_difficulty(&[0x80; 16], 128));
    }

    #[test]
    fn test_leading_zero_bits() {
        assert_eq!(leading_zero_bits(&[0x00, 0x00, 0x0F]), 20);
        assert_eq!(leading_zero_bits(&[0x80]), 0);
        assert_eq!(leading_zero_bits(&[0u8; 4]), 32);
    }

    #[test]
    fn test_monotonic_in_difficulty() {
        let digest = [0x00, 0x03, 0xFF];
        let zeros = leading_zero_bits(&digest);
        for d in 0..=zeros {
            assert!(meets_difficulty(&digest, d), "difficulty {d}");
        }
        assert!(!meets_difficulty(&digest, zeros + 1));
    }

    #[test]
    fn test_hex_digit_conversion() {
        let d = Difficulty::from_hex_digits(3);
        assert_eq!(d.bits(), 12);
        assert_eq!(d.hex_digits(), 3);
        assert_eq!(Difficulty::from_bits(13).hex_digits(), 3);
        assert!(Difficulty::from_bits(128).is_reachable(16));
        assert!(!Difficulty::from_bits(129).is_reachable(16));
    }
}
