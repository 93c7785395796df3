//! Multi-algorithm proof-of-work library
//!
//! Generates and verifies hashcash-style challenges over 35 digest
//! algorithms, alone or combined.
//!
//! # Overview
//!
//! A challenge asks for a nonce such that `H(message || decimal(nonce))`
//! has at least `difficulty` leading zero bits for every selected `H`.
//! Generation walks the nonce range in ascending order and returns the
//! smallest satisfying nonce; verification recomputes the digests of a
//! claimed nonce without searching.
//!
//! # Modules
//!
//! - [`engine`] - the search engine, verifier and hash registry
//! - [`wire`] - JSON request/response contract
//! - [`config`] - engine configuration file
//!
//! # Example
//!
//! ```rust
//! use multipow::{generate_named, verify_named};
//!
//! let result = generate_named(b"hello world", &["MD5"], 8, 0, 1_000_000).unwrap();
//! let nonce = result.nonce.unwrap();
//!
//! assert!(verify_named(b"hello world", nonce, &["MD5"], 8).unwrap());
//! // Wider than the 128-bit MD5 digest: never satisfied
//! assert!(!verify_named(b"hello world", nonce, &["MD5"], 129).unwrap());
//! ```

// Re-export the core engine
pub use multipow_core as engine;

pub mod config;
pub mod wire;

// Convenience re-exports
pub use engine::{
    generate, generate_named, verify, verify_named, Algorithm, Challenge, PowError, PowResult,
};
