//! Multipow CLI
//!
//! A command-line harness over the proof-of-work engine.
//!
//! # Commands
//!
//! - `generate` - Search for a nonce solving a challenge
//! - `verify` - Check a claimed nonce
//! - `algorithms` - List supported algorithms
//! - `benchmark` - Measure per-algorithm throughput

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use multipow::config::{default_config_path, EngineConfig, ModeSetting, OrderingSetting};
use multipow::engine::{
    entries, resolve_algorithms, Algorithm, Budget, MeasureOptions, Meter, Searcher,
};
use multipow::wire::{GenerateRequest, GenerateResponse, Message, VerifyRequest};

#[derive(Parser)]
#[command(name = "multipow")]
#[command(version)]
#[command(about = "Multi-algorithm proof-of-work generator and verifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (overrides RUST_LOG), e.g. `debug` or `multipow_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Message given as text or hex
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct MessageArgs {
    /// Message text
    #[arg(short, long)]
    message: Option<String>,

    /// Message bytes as hex
    #[arg(long)]
    message_hex: Option<String>,
}

impl MessageArgs {
    fn into_message(self) -> Message {
        match (self.message, self.message_hex) {
            (_, Some(encoded)) => Message::Hex(encoded),
            (Some(text), None) => Message::Text(text),
            (None, None) => Message::Text(String::new()),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Sequential,
    Parallel,
    BestEffort,
}

impl From<ModeArg> for ModeSetting {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => ModeSetting::Sequential,
            ModeArg::Parallel => ModeSetting::Parallel,
            ModeArg::BestEffort => ModeSetting::BestEffort,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderingArg {
    Cost,
    Caller,
    Measured,
}

impl From<OrderingArg> for OrderingSetting {
    fn from(ordering: OrderingArg) -> Self {
        match ordering {
            OrderingArg::Cost => OrderingSetting::Cost,
            OrderingArg::Caller => OrderingSetting::Caller,
            OrderingArg::Measured => OrderingSetting::Measured,
        }
    }
}

/// Search tuning flags; each overrides the config file
#[derive(clap::Args)]
struct SearchArgs {
    /// Number of threads to use (default: number of CPU cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Nonces per parallel work unit
    #[arg(long)]
    chunk_size: Option<u64>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Algorithm check order inside a combined challenge
    #[arg(long, value_enum)]
    ordering: Option<OrderingArg>,

    /// Give up after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a nonce solving a challenge
    Generate {
        #[command(flatten)]
        message: MessageArgs,

        /// Algorithm identifiers, comma separated or repeated
        #[arg(short, long = "algorithm", value_delimiter = ',', required = true)]
        algorithms: Vec<String>,

        /// Target difficulty (number of leading zero bits)
        #[arg(short, long, default_value = "12")]
        difficulty: u32,

        /// First nonce to try
        #[arg(long, default_value = "0")]
        start: u64,

        /// Last nonce to try (default: from config)
        #[arg(long)]
        max: Option<u64>,

        #[command(flatten)]
        search: SearchArgs,

        /// Print the wire response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a claimed nonce
    Verify {
        #[command(flatten)]
        message: MessageArgs,

        /// The nonce to check
        #[arg(short, long)]
        nonce: u64,

        /// Algorithm identifiers, comma separated or repeated
        #[arg(short, long = "algorithm", value_delimiter = ',', required = true)]
        algorithms: Vec<String>,

        /// Target difficulty (number of leading zero bits)
        #[arg(short, long, default_value = "12")]
        difficulty: u32,

        /// Print the wire response as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported algorithms, cheapest first
    Algorithms {
        #[arg(long)]
        json: bool,
    },

    /// Measure per-algorithm throughput
    Benchmark {
        /// Number of hashes per algorithm, summed over all threads
        #[arg(short, long, conflicts_with = "duration")]
        count: Option<u64>,

        /// Seconds per algorithm instead of a fixed hash count
        #[arg(long)]
        duration: Option<u64>,

        /// Number of worker threads (default: from config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Restrict to these algorithms (default: all)
        #[arg(short, long = "algorithm", value_delimiter = ',')]
        algorithms: Vec<String>,

        /// Print rates as a JSON map usable as the config's `rates`
        #[arg(long)]
        json: bool,

        /// Store the rates in the config file and switch to measured ordering
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let result = match cli.command {
        Commands::Generate {
            message,
            algorithms,
            difficulty,
            start,
            max,
            search,
            json,
        } => cmd_generate(
            cli.config,
            message.into_message(),
            algorithms,
            difficulty,
            start,
            max,
            search,
            json,
        ),
        Commands::Verify {
            message,
            nonce,
            algorithms,
            difficulty,
            json,
        } => cmd_verify(cli.config, message.into_message(), nonce, algorithms, difficulty, json),
        Commands::Algorithms { json } => cmd_algorithms(json),
        Commands::Benchmark {
            count,
            duration,
            threads,
            algorithms,
            json,
            save,
        } => cmd_benchmark(cli.config, count, duration, threads, algorithms, json, save),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file and apply command-line overrides
fn build_engine_config(path: Option<PathBuf>, search: &SearchArgs) -> anyhow::Result<EngineConfig> {
    let mut config = EngineConfig::load_or_default(path.as_deref())?;

    if let Some(threads) = search.threads {
        config.threads = Some(threads);
    }
    if let Some(chunk_size) = search.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(mode) = search.mode {
        config.mode = mode.into();
    }
    if let Some(ordering) = search.ordering {
        config.ordering = ordering.into();
    }
    if let Some(timeout_ms) = search.timeout_ms {
        config.timeout_ms = Some(timeout_ms);
    }

    Ok(config)
}

#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    config_path: Option<PathBuf>,
    message: Message,
    algorithms: Vec<String>,
    difficulty: u32,
    start: u64,
    max: Option<u64>,
    search: SearchArgs,
    json: bool,
) -> anyhow::Result<()> {
    let config = build_engine_config(config_path, &search)?;
    let request = GenerateRequest {
        message,
        algorithms,
        difficulty,
        nonce_start: start,
        nonce_max: max.unwrap_or(config.default_nonce_max),
    };

    let challenge = request.challenge()?;
    let searcher = Searcher::new(config.search_options()?)?;

    if !json {
        println!("Searching...");
        println!("Algorithms: {}", request.algorithms.join(", "));
        println!("Difficulty: {} bits", difficulty);
        println!("Nonce range: {}..={}", request.nonce_start, request.nonce_max);
        println!("Mode: {:?}", config.search_mode());
    }

    let result = searcher.run(&challenge);
    let response = GenerateResponse::from(&result);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match result.nonce {
        Some(nonce) => {
            println!("\nFound valid nonce!");
            println!("Nonce: {}", nonce);
            for (name, digest) in response.algorithms.iter().zip(&response.digests) {
                println!("  {:<12} {}", name, digest);
            }
        }
        None => println!("\nNo nonce found ({})", result.outcome),
    }
    println!("\nResults:");
    println!("  Nonces tried: {}", result.attempts);
    println!("  Time elapsed: {:.2}s", result.elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", result.hashrate());

    Ok(())
}

fn cmd_verify(
    config_path: Option<PathBuf>,
    message: Message,
    nonce: u64,
    algorithms: Vec<String>,
    difficulty: u32,
    json: bool,
) -> anyhow::Result<()> {
    let config = EngineConfig::load_or_default(config_path.as_deref())?;
    let request = VerifyRequest {
        message,
        nonce,
        algorithms,
        difficulty,
    };
    let response = request.evaluate_with(config.strategy()?.as_ref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.valid {
        println!("Valid: nonce {} meets {} bits", nonce, difficulty);
    } else {
        println!("Invalid: nonce {} does not meet {} bits", nonce, difficulty);
    }

    if !response.valid {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_algorithms(json: bool) -> anyhow::Result<()> {
    if json {
        let list: Vec<_> = entries()
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "name": spec.name,
                    "aliases": spec.aliases,
                    "family": spec.family.to_string(),
                    "digest_bits": spec.digest_bits(),
                    "cost_rank": spec.algorithm.cost_rank(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{:<4} {:<12} {:<10} {:>5}", "RANK", "NAME", "FAMILY", "BITS");
    for spec in entries() {
        println!(
            "{:<4} {:<12} {:<10} {:>5}",
            spec.algorithm.cost_rank(),
            spec.name,
            spec.family.to_string(),
            spec.digest_bits()
        );
    }
    Ok(())
}

fn cmd_benchmark(
    config_path: Option<PathBuf>,
    count: Option<u64>,
    duration: Option<u64>,
    threads: Option<usize>,
    algorithms: Vec<String>,
    json: bool,
    save: bool,
) -> anyhow::Result<()> {
    // `--save` may name a config file that does not exist yet
    let existing = config_path.as_deref().filter(|path| path.exists());
    let config = EngineConfig::load_or_default(existing)?;
    let algorithms = if algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        resolve_algorithms(&algorithms)?
    };

    let budget = match duration {
        Some(secs) => Budget::Duration(Duration::from_secs(secs)),
        None => Budget::Hashes(count.unwrap_or(100_000)),
    };
    let meter = Meter::new(MeasureOptions::new(budget, threads.unwrap_or(config.threads())))?;

    if !json {
        match budget {
            Budget::Duration(d) => println!(
                "Running benchmark: {} threads, {}s per algorithm...\n",
                meter.options().threads,
                d.as_secs()
            ),
            Budget::Hashes(n) => println!(
                "Running benchmark: {} threads, {} hashes per algorithm...\n",
                meter.options().threads,
                n
            ),
        }
        println!(
            "  {:<12} {:>14} {:>14} {:>14} {:>14}",
            "ALGORITHM", "OVERALL H/s", "AVG H/s", "MIN H/s", "MAX H/s"
        );
    }

    let mut rates = BTreeMap::new();
    for algorithm in algorithms {
        let sample = meter.measure(algorithm);
        if !json {
            println!(
                "  {:<12} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
                algorithm.name(),
                sample.rate,
                sample.avg(),
                sample.min(),
                sample.max()
            );
        }
        rates.insert(algorithm.name().to_string(), sample.rate);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
    }

    if save {
        let path = match config_path.or_else(default_config_path) {
            Some(path) => path,
            None => anyhow::bail!("No config directory available; pass --config"),
        };
        let mut config = EngineConfig::load_or_default(path.exists().then_some(path.as_path()))?;
        config.rates = rates;
        config.ordering = OrderingSetting::Measured;
        config.save(&path)?;
        if !json {
            println!("\nSaved measured ordering to {}", path.display());
        }
    }

    Ok(())
}
