//! # pi_core - Arbitrary-Precision π Engine
//!
//! `pi_core` computes π to a requested number of decimal places with the
//! Chudnovsky series. The term index space is cut into contiguous ranges that
//! can be summed on independent threads; the partial sums are merged exactly,
//! so a result never depends on the worker count.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Sequential and parallel paths return identical digits
//! - **Truncated, not rounded**: Guard digits are computed internally and
//!   dropped before a result is returned
//! - **Rich Errors**: Structured error types, serializable to JSON
//! - **Bounded**: Parallel runs carry a deadline and cancel their workers
//!
//! ## Quick Start
//!
//! ```rust
//! use pi_core::{compute_parallel, compute_sequential};
//!
//! let pi = compute_sequential(20).unwrap();
//! assert_eq!(pi, "3.14159265358979323846");
//! assert_eq!(compute_parallel(20, 3).unwrap(), pi);
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Sequential and parallel orchestration
//! - [`series`] - Term planning, partial sums and the final merge
//! - [`numeric`] - Arbitrary-precision decimal arithmetic
//! - [`precision`] - Requested digits and guard digits
//! - [`config`] - Engine settings and TOML loading
//! - [`cancel`] - Cooperative cancellation of workers
//! - [`errors`] - Structured error types

pub mod cancel;
pub mod config;
pub mod engine;
pub mod errors;
pub mod numeric;
pub mod precision;
pub mod series;

// Re-export commonly used types at crate root for convenience
pub use config::EngineConfig;
pub use engine::{compute_parallel, compute_sequential, PiDigits, PiEngine};
pub use errors::{PiError, PiResult};
pub use precision::Precision;
