//! # Numeric Primitives
//!
//! Arbitrary-precision arithmetic used by the series engine:
//!
//! - [`Decimal`] - decimal floating values where every operation takes the
//!   number of significant digits to keep
//! - [`factorial`] / [`int_pow`] - exact integer helpers for closed-form terms
//!
//! ## Example
//!
//! ```rust
//! use pi_core::numeric::Decimal;
//!
//! let two = Decimal::from(2u64);
//! let root = two.sqrt(40).unwrap().truncate_significant(12);
//! assert_eq!(root.to_string(), "1.41421356237");
//! ```

mod decimal;
mod integer;

pub use decimal::Decimal;
pub use integer::{factorial, int_pow};
