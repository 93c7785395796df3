//! Algorithm ordering
//!
//! A combined challenge rejects a nonce as soon as one algorithm misses the
//! difficulty, so checking cheap algorithms first lowers the average cost of
//! a rejection. Ordering never changes which nonces pass.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::measure::RateSample;
use crate::params::ALGORITHM_COUNT;

/// Evaluation order heuristic for combined challenges.
///
/// `order` must return a permutation of its input.
pub trait OrderingStrategy: Send + Sync + fmt::Debug {
    fn order(&self, algorithms: &[Algorithm]) -> Vec<Algorithm>;

    /// Short label for logs
    fn name(&self) -> &'static str;
}

/// Static cost ranking, cheapest first
#[derive(Debug, Clone, Copy, Default)]
pub struct CostRanking;

impl OrderingStrategy for CostRanking {
    fn order(&self, algorithms: &[Algorithm]) -> Vec<Algorithm> {
        let mut ordered = algorithms.to_vec();
        ordered.sort_by_key(|a| a.cost_rank());
        ordered
    }

    fn name(&self) -> &'static str {
        "cost"
    }
}

/// Leaves the caller's order untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerOrder;

impl OrderingStrategy for CallerOrder {
    fn order(&self, algorithms: &[Algorithm]) -> Vec<Algorithm> {
        algorithms.to_vec()
    }

    fn name(&self) -> &'static str {
        "caller"
    }
}

/// Ranking from measured throughput on the current machine.
///
/// Measured algorithms come first, fastest first. Algorithms without a
/// sample follow in static cost order.
#[derive(Debug, Clone, Default)]
pub struct MeasuredRanking {
    rates: HashMap<Algorithm, f64>,
}

impl MeasuredRanking {
    /// Build from `(algorithm, hashes per second)` samples.
    ///
    /// Non-finite or non-positive rates are discarded.
    pub fn from_samples(samples: impl IntoIterator<Item = (Algorithm, f64)>) -> Self {
        let rates = samples
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        Self { rates }
    }

    /// Build from identifier keyed samples, e.g. a benchmark's JSON output
    pub fn from_named<S: AsRef<str>>(samples: impl IntoIterator<Item = (S, f64)>) -> Result<Self> {
        let parsed = samples
            .into_iter()
            .map(|(name, rate)| -> Result<(Algorithm, f64)> {
                Ok((name.as_ref().parse::<Algorithm>()?, rate))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_samples(parsed))
    }

    /// Build from the overall rates of a throughput run
    pub fn from_measurements(samples: &[RateSample]) -> Self {
        Self::from_samples(samples.iter().map(|s| (s.algorithm, s.rate)))
    }

    pub fn rate(&self, algorithm: Algorithm) -> Option<f64> {
        self.rates.get(&algorithm).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl OrderingStrategy for MeasuredRanking {
    fn order(&self, algorithms: &[Algorithm]) -> Vec<Algorithm> {
        let mut ordered = algorithms.to_vec();
        ordered.sort_by(|a, b| match (self.rate(*a), self.rate(*b)) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cost_rank().cmp(&b.cost_rank()),
        });
        ordered
    }

    fn name(&self) -> &'static str {
        "measured"
    }
}

/// Default strategy used by the search engine and the verifier
pub fn default_strategy() -> Arc<dyn OrderingStrategy> {
    Arc::new(CostRanking)
}

/// The `n` cheapest algorithms by static cost rank.
///
/// Handy for building combined challenges of a given width.
pub fn fastest(n: usize) -> Vec<Algorithm> {
    Algorithm::ALL[..n.min(ALGORITHM_COUNT)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(input: &[Algorithm], output: &[Algorithm]) -> bool {
        let mut a = input.to_vec();
        let mut b = output.to_vec();
        a.sort();
        b.sort();
        a == b
    }

    #[test]
    fn test_cost_ranking_puts_cheap_first() {
        let input = [Algorithm::Whirlpool, Algorithm::Md2, Algorithm::Md5, Algorithm::Sha2_512];
        let ordered = CostRanking.order(&input);
        assert_eq!(
            ordered,
            vec![Algorithm::Md5, Algorithm::Sha2_512, Algorithm::Whirlpool, Algorithm::Md2]
        );
        assert!(is_permutation(&input, &ordered));
    }

    #[test]
    fn test_caller_order_is_identity() {
        let input = [Algorithm::Md2, Algorithm::Md4];
        assert_eq!(CallerOrder.order(&input), input.to_vec());
    }

    #[test]
    fn test_measured_ranking() {
        let ranking = MeasuredRanking::from_samples([
            (Algorithm::Sha2_256, 9.0e6),
            (Algorithm::Whirlpool, 12.0e6),
            (Algorithm::Md2, f64::NAN),
        ]);
        assert_eq!(ranking.len(), 2);

        let input = [Algorithm::Md2, Algorithm::Sha2_256, Algorithm::Md5, Algorithm::Whirlpool];
        let ordered = ranking.order(&input);
        assert_eq!(
            ordered,
            vec![Algorithm::Whirlpool, Algorithm::Sha2_256, Algorithm::Md5, Algorithm::Md2]
        );
        assert!(is_permutation(&input, &ordered));
    }

    #[test]
    fn test_measured_ranking_from_names() {
        let ranking = MeasuredRanking::from_named([("MD5", 1.0), ("SHA256", 2.0)]).unwrap();
        assert_eq!(ranking.rate(Algorithm::Sha2_256), Some(2.0));
        assert!(MeasuredRanking::from_named([("nope", 1.0)]).is_err());
    }

    #[test]
    fn test_fastest() {
        assert_eq!(fastest(3), vec![Algorithm::Md4, Algorithm::Nt, Algorithm::Md5]);
        assert_eq!(fastest(0), Vec::<Algorithm>::new());
        assert_eq!(fastest(1000).len(), ALGORITHM_COUNT);
    }
}
