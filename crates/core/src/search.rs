//! Nonce search engine
//!
//! Walks `[nonce_start, nonce_max]` in ascending order and returns the first
//! nonce whose preimage satisfies the difficulty under every algorithm of
//! the challenge. Per nonce, algorithms are checked in the orderer's
//! sequence and the nonce is dropped on the first miss.
//!
//! The parallel form splits the range into contiguous chunks and keeps the
//! sequential answer: a hit in chunk `i` is only accepted once every chunk
//! below `i` has been searched to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::algorithm::Algorithm;
use crate::challenge::Challenge;
use crate::difficulty::meets_difficulty;
use crate::error::{PowError, Result};
use crate::order::{CostRanking, OrderingStrategy, default_strategy};
use crate::params::{CANCEL_POLL_INTERVAL, DEFAULT_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::preimage::Preimage;
use crate::registry::{self, HashFn};
use crate::result::{Outcome, PowResult};

/// Cooperative cancellation flag shared between a caller and a search
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search holding this token to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Execution strategy of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Single-threaded ascending walk
    #[default]
    Sequential,
    /// Chunked search on a worker pool; same answer as `Sequential`
    Parallel { threads: usize, chunk_size: u64 },
    /// Chunked search that accepts the first hit from any worker.
    ///
    /// Not necessarily the smallest satisfying nonce.
    BestEffort { threads: usize, chunk_size: u64 },
}

impl SearchMode {
    /// Parallel mode with the default chunk size
    pub fn parallel(threads: usize) -> Self {
        SearchMode::Parallel {
            threads,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Whether a hit is guaranteed to be minimal
    pub fn is_minimal(&self) -> bool {
        !matches!(self, SearchMode::BestEffort { .. })
    }
}

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub strategy: Arc<dyn OrderingStrategy>,
    pub mode: SearchMode,
    pub cancel: Option<CancelToken>,
    pub timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            mode: SearchMode::Sequential,
            cancel: None,
            timeout: None,
        }
    }
}

impl SearchOptions {
    pub fn with_strategy(mut self, strategy: Arc<dyn OrderingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Stop conditions checked by the scan loop
struct Stop<'a> {
    cancel: Option<&'a CancelToken>,
    deadline: Option<Instant>,
}

impl Stop<'_> {
    #[inline(always)]
    fn triggered(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Per-call search state, shared read-only by all workers
struct Job<'a> {
    message: &'a [u8],
    hashes: Vec<HashFn>,
    difficulty: u32,
    stop: Stop<'a>,
    attempts: AtomicU64,
}

/// Outcome of scanning one contiguous sub-range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Hit(u64),
    Exhausted,
    Interrupted,
}

impl Job<'_> {
    /// Scan `[lo, hi]` ascending
    fn scan(&self, lo: u64, hi: u64) -> Scan {
        let mut buffer = Preimage::new(self.message);
        let mut nonce = lo;

        let scan = loop {
            if (nonce - lo) % CANCEL_POLL_INTERVAL == 0 && self.stop.triggered() {
                break Scan::Interrupted;
            }

            let input = buffer.with_nonce(nonce);
            let hit = self
                .hashes
                .iter()
                .all(|hash| meets_difficulty(hash(input).as_bytes(), self.difficulty));
            if hit {
                break Scan::Hit(nonce);
            }
            if nonce == hi {
                break Scan::Exhausted;
            }
            nonce += 1;
        };

        let evaluated = match scan {
            Scan::Interrupted => nonce - lo,
            _ => (nonce - lo).saturating_add(1),
        };
        self.attempts.fetch_add(evaluated, Ordering::Relaxed);
        scan
    }
}

/// Reusable search engine.
///
/// Holds the worker pool for parallel modes, so one `Searcher` can serve
/// many challenges without respawning threads.
#[derive(Debug)]
pub struct Searcher {
    options: SearchOptions,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl Searcher {
    /// Validate options and start the worker pool if one is needed
    pub fn new(options: SearchOptions) -> Result<Self> {
        match options.mode {
            SearchMode::Sequential => Ok(Self::sequential(options)),
            SearchMode::Parallel {
                threads,
                chunk_size,
            }
            | SearchMode::BestEffort {
                threads,
                chunk_size,
            } => {
                if threads == 0 {
                    return Err(PowError::InvalidThreadCount);
                }
                if chunk_size < MIN_CHUNK_SIZE {
                    return Err(PowError::InvalidChunkSize(chunk_size));
                }
                Self::with_pool(options, threads)
            }
        }
    }

    fn sequential(options: SearchOptions) -> Self {
        Self {
            options,
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    #[cfg(feature = "parallel")]
    fn with_pool(options: SearchOptions, threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("multipow-worker-{i}"))
            .build()
            .map_err(|e| PowError::ThreadPool(e.to_string()))?;
        Ok(Self {
            options,
            pool: Some(pool),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn with_pool(options: SearchOptions, threads: usize) -> Result<Self> {
        tracing::debug!(threads, "built without `parallel`; searching sequentially");
        Ok(Self::sequential(options))
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Search a challenge.
    ///
    /// Never fails: exhaustion and cancellation are outcomes, and all
    /// configuration was validated when the challenge and the searcher
    /// were built.
    pub fn run(&self, challenge: &Challenge) -> PowResult {
        let started = Instant::now();
        let algorithms = challenge.algorithms().to_vec();
        let difficulty = challenge.difficulty();

        if !challenge.is_reachable() {
            tracing::warn!(
                difficulty = difficulty.bits(),
                "difficulty unreachable for at least one algorithm; skipping search"
            );
            return PowResult::empty(Outcome::Exhausted, algorithms, difficulty)
                .with_stats(0, started.elapsed());
        }

        let order = self.options.strategy.order(&algorithms);
        let job = Job {
            message: challenge.message(),
            hashes: order.iter().map(|&a| registry::spec(a).compute).collect(),
            difficulty: difficulty.bits(),
            stop: Stop {
                cancel: self.options.cancel.as_ref(),
                deadline: self.options.timeout.map(|t| started + t),
            },
            attempts: AtomicU64::new(0),
        };

        tracing::debug!(
            algorithms = ?algorithms,
            search_order = ?order,
            strategy = self.options.strategy.name(),
            difficulty = difficulty.bits(),
            nonce_start = challenge.nonce_start(),
            nonce_max = challenge.nonce_max(),
            mode = ?self.options.mode,
            "search started"
        );

        let scan = self.dispatch(&job, challenge.nonce_start(), challenge.nonce_max());
        let attempts = job.attempts.load(Ordering::Relaxed);
        let elapsed = started.elapsed();

        let result = match scan {
            Scan::Hit(nonce) => {
                let mut buffer = Preimage::new(challenge.message());
                let input = buffer.with_nonce(nonce);
                let digests = algorithms.iter().map(|a| a.compute(input)).collect();
                tracing::info!(nonce, attempts, ?elapsed, "nonce found");
                PowResult::success(nonce, algorithms, digests, difficulty, self.options.mode.is_minimal())
            }
            Scan::Exhausted => {
                tracing::info!(attempts, ?elapsed, "nonce range exhausted");
                PowResult::empty(Outcome::Exhausted, algorithms, difficulty)
            }
            Scan::Interrupted => {
                tracing::warn!(attempts, ?elapsed, "search cancelled");
                PowResult::empty(Outcome::Cancelled, algorithms, difficulty)
            }
        };
        result.with_stats(attempts, elapsed)
    }

    #[cfg(feature = "parallel")]
    fn dispatch(&self, job: &Job<'_>, start: u64, max: u64) -> Scan {
        use rayon::prelude::*;

        let (pool, chunk_size, first) = match (&self.pool, self.options.mode) {
            (Some(pool), SearchMode::Parallel { chunk_size, .. }) => (pool, chunk_size, true),
            (Some(pool), SearchMode::BestEffort { chunk_size, .. }) => (pool, chunk_size, false),
            _ => return job.scan(start, max),
        };

        // Inclusive range of span + 1 nonces, split into ceil((span + 1) / chunk) chunks
        let chunks = (max - start) / chunk_size + 1;
        let scan_chunk = |index: u64| -> Option<Scan> {
            let lo = start + index * chunk_size;
            let hi = lo.saturating_add(chunk_size - 1).min(max);
            let scan = job.scan(lo, hi);
            tracing::trace!(chunk = index, lo, hi, ?scan, "chunk done");
            match scan {
                Scan::Exhausted => None,
                other => Some(other),
            }
        };

        let found = pool.install(|| {
            if first {
                (0..chunks).into_par_iter().find_map_first(scan_chunk)
            } else {
                (0..chunks).into_par_iter().find_map_any(scan_chunk)
            }
        });
        found.unwrap_or(Scan::Exhausted)
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch(&self, job: &Job<'_>, start: u64, max: u64) -> Scan {
        job.scan(start, max)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::sequential(SearchOptions::default())
    }
}

/// Search a challenge sequentially with the default cost ordering
pub fn generate(challenge: &Challenge) -> PowResult {
    Searcher::default().run(challenge)
}

/// Search a challenge with explicit options
pub fn generate_with(challenge: &Challenge, options: SearchOptions) -> Result<PowResult> {
    Ok(Searcher::new(options)?.run(challenge))
}

/// Boundary form: identifiers in, result out.
///
/// Configuration errors surface before any hashing.
pub fn generate_named<S: AsRef<str>>(
    message: &[u8],
    algorithms: &[S],
    difficulty: u32,
    nonce_start: u64,
    nonce_max: u64,
) -> Result<PowResult> {
    let challenge = Challenge::from_names(message, algorithms, difficulty, nonce_start, nonce_max)?;
    Ok(generate(&challenge))
}

/// Search order the default strategy would use
pub fn search_order(algorithms: &[Algorithm]) -> Vec<Algorithm> {
    CostRanking.order(algorithms)
}
