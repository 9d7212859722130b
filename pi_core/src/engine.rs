//! # Pi Engine
//!
//! Orchestrates a computation end to end: precision validation, term
//! planning, partial sums, merge.
//!
//! The sequential path sums `[0, terms)` on the calling thread. The parallel
//! path gives every planned range its own named thread; results come back
//! over a channel tagged with their range index and are merged exactly, so
//! both paths produce the same digits for any worker count.
//!
//! ## Example
//!
//! ```rust
//! use pi_core::engine::{compute_parallel, compute_sequential, PiEngine};
//! use pi_core::config::EngineConfig;
//!
//! assert_eq!(compute_sequential(10).unwrap(), "3.1415926535");
//! assert_eq!(compute_parallel(10, 4).unwrap(), "3.1415926535");
//!
//! let engine = PiEngine::new(EngineConfig::new().with_guard_digits(20));
//! let pi = engine.compute_parallel(30, 3).unwrap();
//! assert_eq!(pi.value, "3.141592653589793238462643383279");
//! assert_eq!(pi.workers, 3);
//! ```

use std::fmt;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{unbounded, RecvTimeoutError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::errors::{PiError, PiResult};
use crate::precision::Precision;
use crate::series::{
    compute_range, compute_range_cancellable, merge, plan, term_count, PartialSum, Range,
};

/// Upper bound on the worker count of one parallel computation
pub const MAX_WORKERS: i64 = 4096;

/// Sums one range on a worker thread.
type RangeWorker = fn(&Range, &Precision, &CancellationToken) -> PiResult<PartialSum>;

/// Digits of π together with how they were produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiDigits {
    /// `3.` followed by exactly `precision` decimals
    pub value: String,
    /// Requested digits after the decimal point
    pub precision: u64,
    /// Series terms summed
    pub terms: u64,
    /// Threads used (1 for the sequential path)
    pub workers: usize,
}

impl fmt::Display for PiDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Runs computations under one [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct PiEngine {
    config: EngineConfig,
}

impl PiEngine {
    pub fn new(config: EngineConfig) -> Self {
        PiEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// π to `digits` decimals on the calling thread.
    pub fn compute(&self, digits: i64) -> PiResult<PiDigits> {
        let started = Instant::now();
        let precision = self.precision(digits)?;
        let terms = term_count(&precision)?;

        let partial = compute_range(&Range::from_bounds(0, terms), &precision)?;
        let pi = merge(std::slice::from_ref(&partial), &precision)?;

        info!(
            digits = precision.digits(),
            terms,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sequential computation finished"
        );
        Ok(PiDigits {
            value: pi.to_string(),
            precision: precision.digits(),
            terms,
            workers: 1,
        })
    }

    /// π to `digits` decimals using `workers` threads.
    ///
    /// Fails with [`PiError::Timeout`] when the configured deadline passes
    /// first; outstanding workers are cancelled and left to wind down.
    pub fn compute_parallel(&self, digits: i64, workers: i64) -> PiResult<PiDigits> {
        if workers <= 0 || workers > MAX_WORKERS {
            return Err(PiError::invalid_input(
                "workers",
                workers.to_string(),
                format!("Worker count must be between 1 and {}", MAX_WORKERS),
            ));
        }
        let started = Instant::now();
        let precision = self.precision(digits)?;
        let ranges = plan(workers, &precision)?;
        let terms = ranges.last().map(Range::end).unwrap_or(0);

        let cancel = CancellationToken::new();
        let partials =
            self.run_workers(&ranges, &precision, compute_range_cancellable, &cancel)?;
        let pi = merge(&partials, &precision)?;

        info!(
            digits = precision.digits(),
            terms,
            workers = ranges.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "parallel computation finished"
        );
        Ok(PiDigits {
            value: pi.to_string(),
            precision: precision.digits(),
            terms,
            workers: ranges.len(),
        })
    }

    fn precision(&self, digits: i64) -> PiResult<Precision> {
        Precision::new(digits)?.with_guard_digits(self.config.guard_digits)
    }

    /// One thread per range running `worker`. Partial sums are returned in
    /// range order; `cancel` is set as soon as the call gives up.
    fn run_workers(
        &self,
        ranges: &[Range],
        precision: &Precision,
        worker: RangeWorker,
        cancel: &CancellationToken,
    ) -> PiResult<Vec<PartialSum>> {
        let total = ranges.len();
        let (sender, receiver) = unbounded::<(usize, PiResult<PartialSum>)>();
        let deadline = Instant::now().checked_add(self.config.deadline());

        for (index, range) in ranges.iter().copied().enumerate() {
            let sender = sender.clone();
            let worker_cancel = cancel.clone();
            let precision = *precision;
            let spawned = thread::Builder::new()
                .name(format!("pi-worker-{}", index))
                .spawn(move || {
                    let result = worker(&range, &precision, &worker_cancel);
                    // Fails only when the engine has already given up.
                    let _ = sender.send((index, result));
                });
            if let Err(e) = spawned {
                cancel.cancel();
                return Err(PiError::computation_failed("spawn worker", e.to_string()));
            }
        }
        drop(sender);

        let mut slots: Vec<Option<PartialSum>> = vec![None; total];
        let mut completed = 0;
        while completed < total {
            let message = match deadline {
                Some(deadline) => receiver.recv_deadline(deadline),
                None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match message {
                Ok((index, Ok(partial))) => {
                    slots[index] = Some(partial);
                    completed += 1;
                }
                Ok((index, Err(e))) => {
                    cancel.cancel();
                    warn!(worker = index, error = %e, "worker failed");
                    return Err(e);
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancel.cancel();
                    warn!(
                        deadline_ms = self.config.deadline_ms,
                        completed, total, "deadline passed"
                    );
                    return Err(PiError::Timeout {
                        deadline_ms: self.config.deadline_ms,
                        completed,
                        total,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    cancel.cancel();
                    warn!(completed, total, "worker exited without a result");
                    return Err(PiError::computation_failed(
                        "join workers",
                        format!("worker lost with {}/{} ranges complete", completed, total),
                    ));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// π to `digits` decimals with the default configuration, single-threaded.
pub fn compute_sequential(digits: i64) -> PiResult<String> {
    PiEngine::default().compute(digits).map(|pi| pi.value)
}

/// π to `digits` decimals with the default configuration on `workers` threads.
pub fn compute_parallel(digits: i64, workers: i64) -> PiResult<String> {
    PiEngine::default()
        .compute_parallel(digits, workers)
        .map(|pi| pi.value)
}
