//! Engine parameters
//!
//! Sizes and tuning knobs shared by the registry, the search engine and the
//! verifier.

/// Number of registered digest algorithms
pub const ALGORITHM_COUNT: usize = 35;

/// Widest digest produced by any registered algorithm (512 bits)
pub const MAX_DIGEST_SIZE: usize = 64;

/// Widest digest in bits
pub const MAX_DIGEST_BITS: u32 = (MAX_DIGEST_SIZE * 8) as u32;

/// Bits covered by one hex digit of difficulty
pub const HEX_DIGIT_BITS: u32 = 4;

/// Decimal digits needed for `u64::MAX`
pub const MAX_NONCE_DIGITS: usize = 20;

/// Default first nonce of a search
pub const DEFAULT_NONCE_START: u64 = 0;

/// Default last nonce of a search
pub const DEFAULT_NONCE_MAX: u64 = 100_000_000;

/// Nonces per work unit in parallel search
pub const DEFAULT_CHUNK_SIZE: u64 = 4096;

/// Smallest accepted work unit
pub const MIN_CHUNK_SIZE: u64 = 64;

/// Nonces evaluated between two cancellation checks
pub const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Hashes a throughput worker evaluates between two budget checks
pub const MEASURE_BATCH: u64 = 256;

/// Width of one throughput sampling window (milliseconds)
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;
