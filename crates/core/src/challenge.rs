//! Challenge definition

use crate::algorithm::{Algorithm, check_algorithms, resolve_algorithms};
use crate::difficulty::Difficulty;
use crate::error::{PowError, Result};

/// A validated proof-of-work challenge.
///
/// Construction fails fast on configuration errors, so a `Challenge` that
/// exists can always be searched. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    message: Vec<u8>,
    algorithms: Vec<Algorithm>,
    difficulty: Difficulty,
    nonce_start: u64,
    nonce_max: u64,
}

impl Challenge {
    /// Multi-algorithm challenge; every algorithm must pass for a nonce to count.
    ///
    /// `nonce_max` is inclusive.
    pub fn new(
        message: impl Into<Vec<u8>>,
        algorithms: &[Algorithm],
        difficulty: u32,
        nonce_start: u64,
        nonce_max: u64,
    ) -> Result<Self> {
        check_algorithms(algorithms)?;
        Self::build(message.into(), algorithms.to_vec(), difficulty, nonce_start, nonce_max)
    }

    /// Same as [`Challenge::new`] with algorithms given by identifier
    pub fn from_names<S: AsRef<str>>(
        message: impl Into<Vec<u8>>,
        names: &[S],
        difficulty: u32,
        nonce_start: u64,
        nonce_max: u64,
    ) -> Result<Self> {
        let algorithms = resolve_algorithms(names)?;
        Self::build(message.into(), algorithms, difficulty, nonce_start, nonce_max)
    }

    /// Single-algorithm challenge
    pub fn single(
        message: impl Into<Vec<u8>>,
        algorithm: Algorithm,
        difficulty: u32,
        nonce_start: u64,
        nonce_max: u64,
    ) -> Result<Self> {
        Self::build(message.into(), vec![algorithm], difficulty, nonce_start, nonce_max)
    }

    fn build(
        message: Vec<u8>,
        algorithms: Vec<Algorithm>,
        difficulty: u32,
        nonce_start: u64,
        nonce_max: u64,
    ) -> Result<Self> {
        if nonce_start > nonce_max {
            return Err(PowError::InvalidRange {
                start: nonce_start,
                max: nonce_max,
            });
        }

        let difficulty = Difficulty::from_bits(difficulty);
        for algorithm in &algorithms {
            if !difficulty.is_reachable(algorithm.digest_len()) {
                tracing::warn!(
                    %algorithm,
                    digest_bits = algorithm.digest_bits(),
                    difficulty = difficulty.bits(),
                    "difficulty exceeds digest width; no nonce can satisfy it"
                );
            }
        }

        Ok(Self {
            message,
            algorithms,
            difficulty,
            nonce_start,
            nonce_max,
        })
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Algorithms in caller order
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn nonce_start(&self) -> u64 {
        self.nonce_start
    }

    /// Last nonce searched (inclusive)
    pub fn nonce_max(&self) -> u64 {
        self.nonce_max
    }

    pub fn contains(&self, nonce: u64) -> bool {
        (self.nonce_start..=self.nonce_max).contains(&nonce)
    }

    /// Whether every algorithm's digest is wide enough for the difficulty
    pub fn is_reachable(&self) -> bool {
        self.algorithms
            .iter()
            .all(|a| self.difficulty.is_reachable(a.digest_len()))
    }
}
