//! # Chudnovsky Series
//!
//! ```text
//!   1      12  ∞  (-1)^k (6k)! (13591409 + 545140134 k)
//!  --- =  ---  Σ  ----------------------------------------
//!   π     C^3/2 k=0     (3k)! (k!)^3 C^(3k)
//! ```
//!
//! with `C = 640320`. Writing `a_k = (-1)^k (6k)! / ((3k)! (k!)^3 C^(3k))` and
//! `b_k = k · a_k`, the whole computation reduces to two sums:
//!
//! ```text
//!  π = 426880 · sqrt(10005) / (13591409 · Σa_k + 545140134 · Σb_k)
//! ```
//!
//! The term index space is cut into [`Range`]s ([`range::plan`]), each range
//! yields a [`PartialSum`] ([`partial::compute_range`]), and the partial sums
//! are folded into the final value ([`merge::merge`]). Each term adds roughly
//! 14.18 correct digits.
//!
//! ## Example
//!
//! ```rust
//! use pi_core::precision::Precision;
//! use pi_core::series::{compute_range, merge, plan};
//!
//! let precision = Precision::new(30).unwrap();
//! let partials = plan(3, &precision)
//!     .unwrap()
//!     .iter()
//!     .map(|range| compute_range(range, &precision))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let pi = merge(&partials, &precision).unwrap();
//! assert_eq!(pi.to_string(), "3.141592653589793238462643383279");
//! ```

pub mod merge;
pub mod partial;
pub mod range;

use num_bigint::BigInt;

use crate::errors::PiResult;
use crate::numeric::{int_pow, Decimal};

pub use merge::merge;
pub use partial::{compute_range, compute_range_cancellable, PartialSum, TermStrategy};
pub use range::{plan, term_count, Range};

/// The `C` of the series.
pub const C: u64 = 640_320;

/// Weight of `Σa_k` in the denominator.
pub const A_WEIGHT: u64 = 13_591_409;

/// Weight of `Σb_k` in the denominator.
pub const B_WEIGHT: u64 = 545_140_134;

/// Numerator scale: `426880 · sqrt(10005) = C^(3/2) / 12`.
pub const NUMERATOR_SCALE: u64 = 426_880;

pub const NUMERATOR_RADICAND: u64 = 10_005;

/// The digits-per-term logarithm only feeds the ceiling of a small quotient,
/// so it is never evaluated wider than this.
pub(crate) const LOG_DIGITS_CAP: u64 = 64;

/// Series constants evaluated at one call's working precision.
#[derive(Debug, Clone)]
pub struct SeriesConstants {
    /// `C³ / 24`, the per-term denominator factor of the recurrence
    pub c3_over_24: Decimal,
    working: u64,
}

impl SeriesConstants {
    pub fn new(working: u64) -> PiResult<Self> {
        // C³ is divisible by 24, so the constant stays a short exact integer.
        let c3_over_24 = Decimal::from(int_pow(C, 3)? / 24u32);
        Ok(SeriesConstants {
            c3_over_24,
            working,
        })
    }

    /// `log10(C³/24 / 72)`: decimal digits gained per term (≈ 14.18).
    pub fn digits_per_term(&self) -> PiResult<Decimal> {
        let prec = self.working.min(LOG_DIGITS_CAP);
        self.c3_over_24
            .div_int(&BigInt::from(72u32), prec)?
            .log10(prec)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn test_c3_over_24() {
        let constants = SeriesConstants::new(40).unwrap();
        let expected = Decimal::from(10_939_058_860_032_000u64);
        assert_eq!(constants.c3_over_24.cmp_value(&expected), Ordering::Equal);
    }

    #[test]
    fn test_c3_over_24_is_exact_at_any_width() {
        let constants = SeriesConstants::new(20_000).unwrap();
        assert_eq!(constants.c3_over_24.to_string(), "10939058860032000");
    }

    #[test]
    fn test_digits_per_term() {
        let constants = SeriesConstants::new(40).unwrap();
        let digits = constants.digits_per_term().unwrap();
        assert_eq!(
            digits.truncate_significant(30).to_string(),
            "14.1816474627254776555255216781"
        );
    }

    #[test]
    fn test_digits_per_term_is_capped() {
        let narrow = SeriesConstants::new(LOG_DIGITS_CAP).unwrap();
        let wide = SeriesConstants::new(5_000).unwrap();
        assert_eq!(
            narrow.digits_per_term().unwrap().truncate_significant(50).to_string(),
            wide.digits_per_term().unwrap().truncate_significant(50).to_string()
        );
    }
}
