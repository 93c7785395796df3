//! # Multi-algorithm proof-of-work engine
//!
//! Issues and checks hashcash-style challenges: find a nonce such that
//! `H(message || decimal(nonce))` has at least `difficulty` leading zero
//! bits for every selected hash algorithm `H`.
//!
//! ## Features
//!
//! - **35 digest algorithms**: MD2/MD4/MD5/NT, HAS-160, RIPEMD, BLAKE2b/2s,
//!   BLAKE3, SHA-0/1/2, SHA-3, Keccak, SHAKE and Whirlpool
//! - **Combined challenges**: all algorithms must pass; cheap ones are
//!   checked first so most candidates are rejected early
//! - **Deterministic search**: the returned nonce is the smallest one in
//!   range, in sequential and parallel mode alike
//! - **Cancellation**: cancel token and timeout, polled by every worker
//!
//! ## Preimage Format
//!
//! ```text
//! preimage = message || nonce
//!            ^^^^^^^    ^^^^^
//!            any len    decimal ASCII, no padding ("0", "42", "1000")
//! ```
//!
//! ## Example
//!
//! ```rust
//! use multipow_core::{Algorithm, Challenge, generate, verify};
//!
//! let challenge = Challenge::single("hello world", Algorithm::Md5, 8, 0, 1_000_000).unwrap();
//! let result = generate(&challenge);
//!
//! let nonce = result.nonce.unwrap();
//! assert!(verify(b"hello world", nonce, &[Algorithm::Md5], 8));
//! ```
//!
//! ## Parallel Search
//!
//! Enabled by the default `parallel` feature (rayon):
//!
//! ```rust
//! use multipow_core::{Challenge, SearchMode, SearchOptions, Searcher, fastest};
//!
//! let challenge = Challenge::new("hello world", &fastest(2), 4, 0, 1_000_000).unwrap();
//! let searcher = Searcher::new(SearchOptions::default().with_mode(SearchMode::parallel(4))).unwrap();
//! let result = searcher.run(&challenge);
//! assert!(result.found());
//! ```

mod algorithm;
mod challenge;
mod difficulty;
mod digest;
mod error;
mod measure;
mod order;
mod params;
mod preimage;
mod primitives;
mod registry;
mod result;
mod search;
mod verifier;

pub use self::digest::Digest;
pub use algorithm::{Algorithm, Family, resolve_algorithms};
pub use challenge::Challenge;
pub use difficulty::{Difficulty, leading_zero_bits, meets_difficulty};
pub use error::{PowError, Result};
pub use measure::{Budget, MeasureOptions, Meter, RateSample, measure_rates};
pub use order::{
    CallerOrder, CostRanking, MeasuredRanking, OrderingStrategy, default_strategy, fastest,
};
pub use params::*;
pub use preimage::{Preimage, encode_nonce, preimage};
pub use registry::{AlgorithmSpec, HashFn, compute, entries, lookup};
pub use result::{Outcome, PowResult};
pub use search::{
    CancelToken, SearchMode, SearchOptions, Searcher, generate, generate_named, generate_with,
    search_order,
};
pub use verifier::{verify, verify_named, verify_result, verify_with};
