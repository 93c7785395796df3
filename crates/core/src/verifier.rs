//! Verifier
//!
//! Recomputes the digests of a claimed nonce and checks the difficulty.
//! Never searches, places no bound on the nonce, and gives the same answer
//! whatever order the algorithms are checked in.

use crate::algorithm::{Algorithm, resolve_algorithms};
use crate::challenge::Challenge;
use crate::difficulty::meets_difficulty;
use crate::error::Result;
use crate::order::{CostRanking, OrderingStrategy};
use crate::preimage::Preimage;
use crate::result::PowResult;

/// Check `nonce` against every algorithm, cheapest first.
///
/// An empty algorithm list proves nothing and is rejected.
pub fn verify(message: &[u8], nonce: u64, algorithms: &[Algorithm], difficulty: u32) -> bool {
    verify_with(&CostRanking, message, nonce, algorithms, difficulty)
}

/// [`verify`] with an explicit check order
pub fn verify_with(
    strategy: &dyn OrderingStrategy,
    message: &[u8],
    nonce: u64,
    algorithms: &[Algorithm],
    difficulty: u32,
) -> bool {
    if algorithms.is_empty() {
        return false;
    }
    let mut buffer = Preimage::new(message);
    let input = buffer.with_nonce(nonce);
    strategy
        .order(algorithms)
        .into_iter()
        .all(|algorithm| meets_difficulty(algorithm.compute(input).as_bytes(), difficulty))
}

/// Boundary form taking algorithm identifiers.
///
/// Unknown, repeated or missing identifiers are configuration errors, not a
/// `false` answer.
pub fn verify_named<S: AsRef<str>>(
    message: &[u8],
    nonce: u64,
    algorithms: &[S],
    difficulty: u32,
) -> Result<bool> {
    let algorithms = resolve_algorithms(algorithms)?;
    Ok(verify(message, nonce, &algorithms, difficulty))
}

/// Check a reported result against the challenge it claims to solve.
///
/// Beyond the difficulty check this confirms the nonce lies in the
/// challenge range and every reported digest matches its recomputation.
pub fn verify_result(challenge: &Challenge, result: &PowResult) -> bool {
    let Some(nonce) = result.nonce else {
        return false;
    };
    if !result.found()
        || !challenge.contains(nonce)
        || result.algorithms != challenge.algorithms()
        || result.digests.len() != challenge.algorithms().len()
        || result.difficulty != challenge.difficulty()
    {
        return false;
    }

    let mut buffer = Preimage::new(challenge.message());
    let input = buffer.with_nonce(nonce);
    let difficulty = challenge.difficulty().bits();
    challenge
        .algorithms()
        .iter()
        .zip(&result.digests)
        .all(|(algorithm, reported)| {
            let digest = algorithm.compute(input);
            digest == *reported && meets_difficulty(digest.as_bytes(), difficulty)
        })
}
