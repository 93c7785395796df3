//! Error types for challenge construction and engine setup

use thiserror::Error;

use crate::Algorithm;

pub type Result<T> = core::result::Result<T, PowError>;

/// Configuration and environment failures.
///
/// Search exhaustion and verification mismatches are regular outcomes and
/// never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PowError {
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("at least one algorithm is required")]
    EmptyAlgorithms,

    #[error("algorithm {0} listed more than once")]
    DuplicateAlgorithm(Algorithm),

    #[error("invalid nonce range: start {start} is greater than max {max}")]
    InvalidRange { start: u64, max: u64 },

    #[error("chunk size {0} is below the minimum of {}", crate::MIN_CHUNK_SIZE)]
    InvalidChunkSize(u64),

    #[error("thread count must be at least 1")]
    InvalidThreadCount,

    #[error("measurement budget must be non-zero")]
    InvalidBudget,

    #[error("{algorithm} digest must be {expected} bytes, got {actual}")]
    DigestLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} digests, got {actual}")]
    DigestCount { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl From<hex::FromHexError> for PowError {
    fn from(e: hex::FromHexError) -> Self {
        PowError::InvalidHex(e.to_string())
    }
}
