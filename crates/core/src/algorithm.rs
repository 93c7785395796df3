//! Algorithm identifiers
//!
//! A closed set of digest algorithms. Variants are declared in cost order
//! (cheapest first, as measured by the multi-threaded throughput benchmark),
//! so the discriminant doubles as the static cost rank.

use core::fmt;
use core::str::FromStr;

use crate::error::PowError;
use crate::params::ALGORITHM_COUNT;
use crate::registry;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Algorithm {
    Md4,
    Nt,
    Md5,
    Blake3,
    Has160,
    Ripemd256,
    Ripemd128,
    Blake2s128,
    Blake2s160,
    Blake2s256,
    Blake2b512,
    Ripemd320,
    Blake2b128,
    Blake2b384,
    Ripemd160,
    Blake2b160,
    Blake2b256,
    Sha2_256,
    Sha0,
    Sha1,
    Sha2_224,
    Sha2_512,
    Sha2_384,
    Whirlpool,
    Sha3_224,
    Shake256,
    Sha3_384,
    Shake128,
    Keccak384,
    Keccak256,
    Sha3_256,
    Sha3_512,
    Keccak512,
    Keccak224,
    Md2,
}

/// Algorithm families, for grouping in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Md,
    Has,
    Ripemd,
    Blake2b,
    Blake2s,
    Blake3,
    Sha1,
    Sha2,
    Sha3,
    Keccak,
    Shake,
    Whirlpool,
}

impl Algorithm {
    /// Every algorithm, cheapest first
    pub const ALL: [Algorithm; ALGORITHM_COUNT] = [
        Algorithm::Md4,
        Algorithm::Nt,
        Algorithm::Md5,
        Algorithm::Blake3,
        Algorithm::Has160,
        Algorithm::Ripemd256,
        Algorithm::Ripemd128,
        Algorithm::Blake2s128,
        Algorithm::Blake2s160,
        Algorithm::Blake2s256,
        Algorithm::Blake2b512,
        Algorithm::Ripemd320,
        Algorithm::Blake2b128,
        Algorithm::Blake2b384,
        Algorithm::Ripemd160,
        Algorithm::Blake2b160,
        Algorithm::Blake2b256,
        Algorithm::Sha2_256,
        Algorithm::Sha0,
        Algorithm::Sha1,
        Algorithm::Sha2_224,
        Algorithm::Sha2_512,
        Algorithm::Sha2_384,
        Algorithm::Whirlpool,
        Algorithm::Sha3_224,
        Algorithm::Shake256,
        Algorithm::Sha3_384,
        Algorithm::Shake128,
        Algorithm::Keccak384,
        Algorithm::Keccak256,
        Algorithm::Sha3_256,
        Algorithm::Sha3_512,
        Algorithm::Keccak512,
        Algorithm::Keccak224,
        Algorithm::Md2,
    ];

    /// Canonical identifier, e.g. `"SHA2-256"`
    pub fn name(self) -> &'static str {
        registry::spec(self).name
    }

    /// Digest length in bytes
    pub fn digest_len(self) -> usize {
        registry::spec(self).digest_len
    }

    /// Digest length in bits
    pub fn digest_bits(self) -> u32 {
        self.digest_len() as u32 * 8
    }

    pub fn family(self) -> Family {
        registry::spec(self).family
    }

    /// Static cost rank; lower is cheaper to compute
    pub fn cost_rank(self) -> u8 {
        self as u8
    }

    /// Hash a complete preimage
    #[inline(always)]
    pub fn compute(self, input: &[u8]) -> crate::Digest {
        (registry::spec(self).compute)(input)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PowError;

    /// Case-sensitive lookup by canonical identifier or alias
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::lookup(s)
            .map(|spec| spec.algorithm)
            .ok_or_else(|| PowError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Md => "MD",
            Family::Has => "HAS",
            Family::Ripemd => "RIPEMD",
            Family::Blake2b => "BLAKE2b",
            Family::Blake2s => "BLAKE2s",
            Family::Blake3 => "BLAKE3",
            Family::Sha1 => "SHA-0/1",
            Family::Sha2 => "SHA-2",
            Family::Sha3 => "SHA-3",
            Family::Keccak => "Keccak",
            Family::Shake => "SHAKE",
            Family::Whirlpool => "Whirlpool",
        };
        f.write_str(name)
    }
}

/// Resolve identifiers into a validated algorithm list.
///
/// Fails on an empty list, an unknown identifier, or a repeated algorithm
/// (aliases of the same algorithm count as repeats).
pub fn resolve_algorithms<S: AsRef<str>>(names: &[S]) -> crate::Result<Vec<Algorithm>> {
    let algorithms = names
        .iter()
        .map(|name| name.as_ref().parse::<Algorithm>())
        .collect::<crate::Result<Vec<_>>>()?;
    check_algorithms(&algorithms)?;
    Ok(algorithms)
}

/// Reject empty or repeating algorithm lists
pub(crate) fn check_algorithms(algorithms: &[Algorithm]) -> crate::Result<()> {
    if algorithms.is_empty() {
        return Err(PowError::EmptyAlgorithms);
    }
    let mut seen = [false; ALGORITHM_COUNT];
    for &algorithm in algorithms {
        let slot = &mut seen[algorithm as usize];
        if *slot {
            return Err(PowError::DuplicateAlgorithm(algorithm));
        }
        *slot = true;
    }
    Ok(())
}
