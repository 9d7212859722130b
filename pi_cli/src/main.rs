//! # pi CLI
//!
//! Command-line front end for `pi_core`.
//!
//! - `pi compute` prints π to the requested number of decimals
//! - `pi compare` times the sequential path against the parallel path for a
//!   range of worker counts and checks that every result agrees
//!
//! Set `RUST_LOG=pi_core=debug` to see per-range progress on stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pi_core::{EngineConfig, PiDigits, PiEngine, PiError, PiResult};

const DEFAULT_DIGITS: i64 = 100;

#[derive(Parser)]
#[command(name = "pi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute digits of pi with the Chudnovsky series", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute pi and print its digits
    Compute {
        /// Digits after the decimal point (prompted for when omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        digits: Option<i64>,

        /// Worker threads; runs single-threaded when omitted
        #[arg(short, long, allow_negative_numbers = true)]
        workers: Option<i64>,

        /// Deadline for the parallel path, overriding the config file
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print a JSON report instead of the bare digits
        #[arg(long)]
        json: bool,
    },

    /// Compare sequential and parallel timings
    Compare {
        /// Digits after the decimal point (prompted for when omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        digits: Option<i64>,

        /// Largest worker count to try
        #[arg(short, long, default_value_t = 4, allow_negative_numbers = true)]
        max_workers: i64,
    },
}

/// JSON form of a finished `compute`.
#[derive(Serialize)]
struct ComputeReport<'a> {
    digits: &'a str,
    precision: u64,
    workers: usize,
    terms: u64,
    elapsed_ms: u64,
    computed_at: DateTime<Utc>,
}

impl<'a> ComputeReport<'a> {
    fn new(pi: &'a PiDigits, elapsed: Duration) -> Self {
        ComputeReport {
            digits: &pi.value,
            precision: pi.precision,
            workers: pi.workers,
            terms: pi.terms,
            elapsed_ms: elapsed.as_millis() as u64,
            computed_at: Utc::now(),
        }
    }
}

/// Parse a typed digit count; blank input takes `default`.
fn parse_digits(input: &str, default: i64) -> PiResult<i64> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default);
    }
    input.parse().map_err(|_| {
        PiError::invalid_input("digits", input, "Digit count must be a whole number")
    })
}

fn prompt_digits(prompt: &str, default: i64) -> PiResult<i64> {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return Ok(default);
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return Ok(default);
    }

    parse_digits(&input, default)
}

fn digits_or_prompt(digits: Option<i64>) -> PiResult<i64> {
    match digits {
        Some(digits) => Ok(digits),
        None => prompt_digits(
            &format!("Digits of pi to compute [{}]: ", DEFAULT_DIGITS),
            DEFAULT_DIGITS,
        ),
    }
}

fn load_config(path: Option<&PathBuf>) -> PiResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

/// Process exit status for a failed command.
fn exit_code(error: &PiError) -> i32 {
    if error.is_configuration_error() {
        2
    } else if error.is_timeout() {
        3
    } else {
        1
    }
}

fn run_compute(
    config: EngineConfig,
    digits: i64,
    workers: Option<i64>,
    timeout_secs: Option<u64>,
    json: bool,
) -> PiResult<()> {
    let config = match timeout_secs {
        Some(secs) => config.with_deadline(Duration::from_secs(secs)),
        None => config,
    };
    let engine = PiEngine::new(config);

    let started = Instant::now();
    let pi = match workers {
        Some(workers) => engine.compute_parallel(digits, workers)?,
        None => engine.compute(digits)?,
    };
    let elapsed = started.elapsed();

    if json {
        let report = ComputeReport::new(&pi, elapsed);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| PiError::computation_failed("serialize report", e.to_string()))?;
        println!("{}", json);
    } else {
        println!("{}", pi);
    }
    Ok(())
}

fn run_compare(config: EngineConfig, digits: i64, max_workers: i64) -> PiResult<()> {
    if max_workers <= 0 {
        return Err(PiError::invalid_input(
            "max_workers",
            max_workers.to_string(),
            "Worker count must be positive",
        ));
    }
    let engine = PiEngine::new(config);

    let started = Instant::now();
    let sequential = engine.compute(digits)?;
    let baseline = started.elapsed();

    println!("Computing {} digits ({} terms)", sequential.precision, sequential.terms);
    println!();
    println!("{:>10}  {:>12}  {:>8}", "workers", "seconds", "speedup");
    println!("{:>10}  {:>12.4}  {:>8}", "sequential", baseline.as_secs_f64(), "1.00");

    let mut mismatches = Vec::new();
    for workers in 1..=max_workers {
        let started = Instant::now();
        let parallel = engine.compute_parallel(digits, workers)?;
        let elapsed = started.elapsed();

        let speedup = baseline.as_secs_f64() / elapsed.as_secs_f64().max(f64::EPSILON);
        let agrees = parallel.value == sequential.value;
        println!(
            "{:>10}  {:>12.4}  {:>8.2}{}",
            workers,
            elapsed.as_secs_f64(),
            speedup,
            if agrees { "" } else { "  MISMATCH" }
        );
        if !agrees {
            mismatches.push(workers.to_string());
        }
    }

    if !mismatches.is_empty() {
        return Err(PiError::computation_failed(
            "compare",
            format!("parallel result differs from sequential for workers {}", mismatches.join(", ")),
        ));
    }

    println!();
    println!("All results agree: {}", abbreviate(&sequential.value));
    Ok(())
}

/// First and last few digits of a long result.
fn abbreviate(value: &str) -> String {
    const EDGE: usize = 20;
    if value.len() <= 2 * EDGE + 3 {
        value.to_string()
    } else {
        format!("{}...{}", &value[..EDGE], &value[value.len() - EDGE..])
    }
}

fn run(cli: Cli) -> PiResult<()> {
    let config = load_config(cli.config.as_ref())?;
    info!(?config, "configuration loaded");

    match cli.command {
        Commands::Compute {
            digits,
            workers,
            timeout_secs,
            json,
        } => run_compute(config, digits_or_prompt(digits)?, workers, timeout_secs, json),
        Commands::Compare {
            digits,
            max_workers,
        } => run_compare(config, digits_or_prompt(digits)?, max_workers),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        process::exit(exit_code(&e));
    }
}
