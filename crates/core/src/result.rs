//! Search results

use core::fmt;
use std::time::Duration;

use crate::algorithm::Algorithm;
use crate::difficulty::Difficulty;
use crate::digest::Digest;

/// How a search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A nonce satisfying every algorithm was found
    Found,
    /// The whole range was searched without success
    Exhausted,
    /// Stopped by a cancel token or timeout before a conclusive answer
    Cancelled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Found => "found",
            Outcome::Exhausted => "exhausted",
            Outcome::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Result of one generation call.
///
/// `algorithms` and `digests` are in the challenge's caller order, never in
/// the internal search order. `nonce` and `digests` are only populated when
/// the outcome is [`Outcome::Found`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowResult {
    pub outcome: Outcome,
    pub nonce: Option<u64>,
    pub algorithms: Vec<Algorithm>,
    pub digests: Vec<Digest>,
    pub difficulty: Difficulty,
    /// Nonces evaluated (approximate under parallel search)
    pub attempts: u64,
    pub elapsed: Duration,
    /// Whether a found nonce is guaranteed to be the smallest in range
    pub minimal: bool,
}

impl PowResult {
    pub(crate) fn success(
        nonce: u64,
        algorithms: Vec<Algorithm>,
        digests: Vec<Digest>,
        difficulty: Difficulty,
        minimal: bool,
    ) -> Self {
        Self {
            outcome: Outcome::Found,
            nonce: Some(nonce),
            algorithms,
            digests,
            difficulty,
            attempts: 0,
            elapsed: Duration::ZERO,
            minimal,
        }
    }

    pub(crate) fn empty(outcome: Outcome, algorithms: Vec<Algorithm>, difficulty: Difficulty) -> Self {
        Self {
            outcome,
            nonce: None,
            algorithms,
            digests: Vec::new(),
            difficulty,
            attempts: 0,
            elapsed: Duration::ZERO,
            minimal: true,
        }
    }

    pub(crate) fn with_stats(mut self, attempts: u64, elapsed: Duration) -> Self {
        self.attempts = attempts;
        self.elapsed = elapsed;
        self
    }

    pub fn found(&self) -> bool {
        self.outcome == Outcome::Found
    }

    /// Digest reported for `algorithm`, if found and part of the challenge
    pub fn digest_for(&self, algorithm: Algorithm) -> Option<&Digest> {
        self.algorithms
            .iter()
            .position(|&a| a == algorithm)
            .and_then(|i| self.digests.get(i))
    }

    /// Nonces per second over the whole call
    pub fn hashrate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }
}
