//! Throughput measurement
//!
//! Runs one algorithm at a time on a pool of workers, for a fixed number of
//! hashes or for a wall-clock duration, and samples the shared hash counter
//! once per window. The overall rates feed [`MeasuredRanking`].
//!
//! [`MeasuredRanking`]: crate::MeasuredRanking

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::algorithm::Algorithm;
use crate::error::{PowError, Result};
use crate::params::{DEFAULT_SAMPLE_INTERVAL_MS, MEASURE_BATCH};
use crate::preimage::Preimage;
use crate::registry::{self, HashFn};

const MEASURE_MESSAGE: &[u8] = b"benchmark input data for multipow";

/// How much work each algorithm gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// Stop after this many hashes, summed over all workers
    Hashes(u64),
    /// Stop once this much wall-clock time has passed
    Duration(Duration),
}

/// Measurement configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureOptions {
    pub budget: Budget,
    pub threads: usize,
    /// Window width for the per-window statistics
    pub interval: Duration,
}

impl MeasureOptions {
    pub fn new(budget: Budget, threads: usize) -> Self {
        Self {
            budget,
            threads,
            interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(PowError::InvalidThreadCount);
        }
        let empty = match self.budget {
            Budget::Hashes(count) => count == 0,
            Budget::Duration(duration) => duration.is_zero(),
        };
        if empty || self.interval.is_zero() {
            return Err(PowError::InvalidBudget);
        }
        Ok(())
    }
}

/// Measured throughput of one algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct RateSample {
    pub algorithm: Algorithm,
    pub threads: usize,
    pub hashes: u64,
    pub elapsed: Duration,
    /// Hashes per second over the whole run
    pub rate: f64,
    /// Hashes per second in each complete window
    pub windows: Vec<f64>,
}

impl RateSample {
    /// Slowest window; the overall rate when no window completed
    pub fn min(&self) -> f64 {
        self.windows.iter().copied().reduce(f64::min).unwrap_or(self.rate)
    }

    pub fn max(&self) -> f64 {
        self.windows.iter().copied().reduce(f64::max).unwrap_or(self.rate)
    }

    pub fn avg(&self) -> f64 {
        if self.windows.is_empty() {
            return self.rate;
        }
        self.windows.iter().sum::<f64>() / self.windows.len() as f64
    }
}

/// Shared state of one algorithm's run
struct Run {
    hash: HashFn,
    budget: Budget,
    deadline: Option<Instant>,
    claimed: AtomicU64,
    done: AtomicU64,
}

impl Run {
    /// Worker loop: claim batches of nonces until the budget is spent
    fn work(&self) {
        let mut buffer = Preimage::new(MEASURE_MESSAGE);
        loop {
            let base = self.claimed.fetch_add(MEASURE_BATCH, Ordering::Relaxed);
            let batch = match self.budget {
                Budget::Hashes(total) if base >= total => break,
                Budget::Hashes(total) => MEASURE_BATCH.min(total - base),
                Budget::Duration(_) => MEASURE_BATCH,
            };
            for nonce in base..base + batch {
                std::hint::black_box((self.hash)(buffer.with_nonce(nonce)));
            }
            self.done.fetch_add(batch, Ordering::Relaxed);

            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }
    }
}

/// Record the counter delta of every complete window until `finished`
fn sample(done: &AtomicU64, finished: &AtomicBool, interval: Duration) -> Vec<f64> {
    let window_secs = interval.as_secs_f64();
    let mut windows = Vec::new();
    let mut last = 0;
    let mut next = Instant::now() + interval;

    while !finished.load(Ordering::Acquire) {
        let now = Instant::now();
        if now < next {
            thread::park_timeout(next - now);
            continue;
        }
        let count = done.load(Ordering::Relaxed);
        windows.push((count - last) as f64 / window_secs);
        last = count;
        next += interval;
    }
    windows
}

/// Reusable throughput meter holding its worker pool
#[derive(Debug)]
pub struct Meter {
    options: MeasureOptions,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl Meter {
    pub fn new(options: MeasureOptions) -> Result<Self> {
        options.validate()?;

        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .thread_name(|i| format!("multipow-bench-{i}"))
            .build()
            .map_err(|e| PowError::ThreadPool(e.to_string()))?;

        #[cfg(not(feature = "parallel"))]
        if options.threads > 1 {
            tracing::debug!(threads = options.threads, "built without `parallel`; measuring on one thread");
        }

        Ok(Self {
            options,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn options(&self) -> &MeasureOptions {
        &self.options
    }

    /// Measure a single algorithm
    pub fn measure(&self, algorithm: Algorithm) -> RateSample {
        let started = Instant::now();
        let run = Run {
            hash: registry::spec(algorithm).compute,
            budget: self.options.budget,
            deadline: match self.options.budget {
                Budget::Duration(duration) => Some(started + duration),
                Budget::Hashes(_) => None,
            },
            claimed: AtomicU64::new(0),
            done: AtomicU64::new(0),
        };
        let finished = AtomicBool::new(false);
        let interval = self.options.interval;

        let windows = thread::scope(|scope| {
            let sampler = scope.spawn(|| sample(&run.done, &finished, interval));
            self.run_workers(&|| run.work());
            finished.store(true, Ordering::Release);
            sampler.thread().unpark();
            sampler.join().unwrap_or_default()
        });

        let elapsed = started.elapsed();
        let hashes = run.done.load(Ordering::Relaxed);
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { hashes as f64 / secs } else { 0.0 };

        let sample = RateSample {
            algorithm,
            threads: self.threads(),
            hashes,
            elapsed,
            rate,
            windows,
        };
        tracing::debug!(
            algorithm = %algorithm,
            hashes,
            ?elapsed,
            rate,
            min = sample.min(),
            max = sample.max(),
            "throughput measured"
        );
        sample
    }

    /// Measure each algorithm in turn, in the given order
    pub fn measure_all(&self, algorithms: &[Algorithm]) -> Vec<RateSample> {
        algorithms.iter().map(|&algorithm| self.measure(algorithm)).collect()
    }

    #[cfg(feature = "parallel")]
    fn threads(&self) -> usize {
        self.options.threads
    }

    #[cfg(not(feature = "parallel"))]
    fn threads(&self) -> usize {
        1
    }

    #[cfg(feature = "parallel")]
    fn run_workers(&self, work: &(dyn Fn() + Sync)) {
        self.pool.broadcast(|_| work());
    }

    #[cfg(not(feature = "parallel"))]
    fn run_workers(&self, work: &(dyn Fn() + Sync)) {
        work();
    }
}

/// Measure every algorithm with a fresh [`Meter`]
pub fn measure_rates(algorithms: &[Algorithm], options: MeasureOptions) -> Result<Vec<RateSample>> {
    Ok(Meter::new(options)?.measure_all(algorithms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{MeasuredRanking, OrderingStrategy};

    #[test]
    fn test_hash_budget_is_exact() {
        let options = MeasureOptions::new(Budget::Hashes(10_000), 3);
        let sample = Meter::new(options).unwrap().measure(Algorithm::Md5);
        assert_eq!(sample.algorithm, Algorithm::Md5);
        assert_eq!(sample.hashes, 10_000);
        assert!(sample.rate > 0.0);
    }

    #[test]
    fn test_hash_budget_smaller_than_batch() {
        let options = MeasureOptions::new(Budget::Hashes(5), 4);
        let sample = Meter::new(options).unwrap().measure(Algorithm::Md4);
        assert_eq!(sample.hashes, 5);
    }

    #[test]
    fn test_duration_budget_records_windows() {
        let options = MeasureOptions::new(Budget::Duration(Duration::from_millis(120)), 2)
            .with_interval(Duration::from_millis(10));
        let sample = Meter::new(options).unwrap().measure(Algorithm::Sha2_256);

        assert!(sample.elapsed >= Duration::from_millis(120));
        assert!(sample.hashes > 0);
        assert!(!sample.windows.is_empty());
        assert!(sample.min() <= sample.avg());
        assert!(sample.avg() <= sample.max());
    }

    #[test]
    fn test_stats_without_windows_fall_back_to_rate() {
        let sample = RateSample {
            algorithm: Algorithm::Md5,
            threads: 1,
            hashes: 10,
            elapsed: Duration::from_millis(1),
            rate: 10_000.0,
            windows: Vec::new(),
        };
        assert_eq!(sample.min(), 10_000.0);
        assert_eq!(sample.avg(), 10_000.0);
        assert_eq!(sample.max(), 10_000.0);

        let windowed = RateSample {
            windows: vec![3.0, 1.0, 2.0],
            ..sample
        };
        assert_eq!(windowed.min(), 1.0);
        assert_eq!(windowed.avg(), 2.0);
        assert_eq!(windowed.max(), 3.0);
    }

    #[test]
    fn test_invalid_options() {
        assert_eq!(
            Meter::new(MeasureOptions::new(Budget::Hashes(10), 0)).unwrap_err(),
            PowError::InvalidThreadCount
        );
        assert_eq!(
            Meter::new(MeasureOptions::new(Budget::Hashes(0), 1)).unwrap_err(),
            PowError::InvalidBudget
        );
        assert_eq!(
            Meter::new(MeasureOptions::new(Budget::Duration(Duration::ZERO), 1)).unwrap_err(),
            PowError::InvalidBudget
        );
        let no_window = MeasureOptions::new(Budget::Hashes(10), 1).with_interval(Duration::ZERO);
        assert_eq!(Meter::new(no_window).unwrap_err(), PowError::InvalidBudget);
    }

    #[test]
    fn test_rates_feed_measured_ranking() {
        let algorithms = [Algorithm::Md2, Algorithm::Md4];
        let samples = measure_rates(&algorithms, MeasureOptions::new(Budget::Hashes(2_000), 2)).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].algorithm, Algorithm::Md2);
        assert_eq!(samples[1].algorithm, Algorithm::Md4);

        let ranking = MeasuredRanking::from_measurements(&samples);
        assert_eq!(ranking.len(), 2);
        // MD2 is an order of magnitude slower than MD4 on any machine
        assert_eq!(ranking.order(&algorithms), vec![Algorithm::Md4, Algorithm::Md2]);
    }
}
