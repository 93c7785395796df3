//! Fixed-capacity digest buffer

use core::fmt;

use crate::difficulty::leading_zero_bits;
use crate::params::MAX_DIGEST_SIZE;

/// Output of one registered algorithm.
///
/// Stored inline (no heap allocation) so the search loop can produce and
/// discard digests freely. The length is fixed by the algorithm that
/// produced it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: [u8; MAX_DIGEST_SIZE],
    len: u8,
}

impl Digest {
    /// Zero-length placeholder
    pub const EMPTY: Digest = Digest {
        bytes: [0u8; MAX_DIGEST_SIZE],
        len: 0,
    };

    /// Copy a digest out of a hash function's output.
    ///
    /// Returns `None` if `bytes` is longer than [`MAX_DIGEST_SIZE`].
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > MAX_DIGEST_SIZE {
            return None;
        }
        Some(Self::copy_from(bytes))
    }

    /// Registry-internal constructor; every registered output fits.
    #[inline(always)]
    pub(crate) fn copy_from(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= MAX_DIGEST_SIZE);
        let len = bytes.len().min(MAX_DIGEST_SIZE);
        let mut out = Self::EMPTY;
        out.bytes[..len].copy_from_slice(&bytes[..len]);
        out.len = len as u8;
        out
    }

    /// Build a digest by letting `fill` write exactly `len` bytes.
    #[inline(always)]
    pub(crate) fn with_len(len: usize, fill: impl FnOnce(&mut [u8])) -> Self {
        debug_assert!(len <= MAX_DIGEST_SIZE);
        let len = len.min(MAX_DIGEST_SIZE);
        let mut out = Self::EMPTY;
        fill(&mut out.bytes[..len]);
        out.len = len as u8;
        out
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Digest length in bits
    pub fn bits(&self) -> u32 {
        self.len as u32 * 8
    }

    /// Leading zero bits, MSB-first
    pub fn leading_zero_bits(&self) -> u32 {
        leading_zero_bits(self.as_bytes())
    }

    /// Lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
