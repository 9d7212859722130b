//! # Partial Sums
//!
//! Computes one range's contribution `(Σa_k, Σb_k)` to the series.
//!
//! Consecutive terms are linked by
//!
//! ```text
//!  a_k = a_{k-1} · -(6k-5)(2k-1)(6k-1) / (k³ · C³/24)
//! ```
//!
//! which is cheap but needs the previous term. A range starting at `k = 0`
//! seeds with `a_0 = 1`; any other range seeds from the closed form
//!
//! ```text
//!  a_k = (-1)^k (6k)! / ((3k)! (k!)³ C^(3k))
//! ```
//!
//! and then continues with the recurrence. Every factor of the closed form is
//! an exact integer and only the final division rounds, so the seed is carried
//! at [`SEED_GUARD_DIGITS`] extra digits and rounded once to working precision.
//!
//! Terms shrink by about 14 digits each. A term is only carried to the digits
//! that still reach the running sum's working precision, plus
//! [`TERM_GUARD_DIGITS`] for the `b = k · a` products.

use num_bigint::BigInt;
use tracing::debug;

use super::{Range, SeriesConstants, C};
use crate::cancel::CancellationToken;
use crate::errors::PiResult;
use crate::numeric::{factorial, int_pow, Decimal};
use crate::precision::Precision;

/// Extra digits for the single division that produces a closed-form seed.
pub const SEED_GUARD_DIGITS: u64 = 4;

/// Digits a term keeps below the running sum's last working digit.
pub const TERM_GUARD_DIGITS: u64 = 20;

/// Accumulated `(Σa_k, Σb_k)` over one range, at working precision.
#[derive(Debug, Clone)]
pub struct PartialSum {
    pub a_sum: Decimal,
    pub b_sum: Decimal,
}

impl PartialSum {
    pub fn zero() -> Self {
        PartialSum {
            a_sum: Decimal::zero(),
            b_sum: Decimal::zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.a_sum.is_zero() && self.b_sum.is_zero()
    }
}

/// How the first term of a range is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStrategy {
    /// Start from `a_0 = 1`
    Recurrence,
    /// Start from the closed form of `a_start`
    ClosedFormSeed,
}

impl TermStrategy {
    pub fn for_range(range: &Range) -> Self {
        if range.start() == 0 {
            TermStrategy::Recurrence
        } else {
            TermStrategy::ClosedFormSeed
        }
    }
}

/// Compute the partial sums of `range` at `precision`'s working precision.
pub fn compute_range(range: &Range, precision: &Precision) -> PiResult<PartialSum> {
    compute_range_cancellable(range, precision, &CancellationToken::new())
}

/// Like [`compute_range`], polling `cancel` before every term.
pub fn compute_range_cancellable(
    range: &Range,
    precision: &Precision,
    cancel: &CancellationToken,
) -> PiResult<PartialSum> {
    if range.is_empty() {
        return Ok(PartialSum::zero());
    }
    cancel.check()?;

    let working = precision.working();
    let constants = SeriesConstants::new(working)?;
    let strategy = TermStrategy::for_range(range);

    let mut term = match strategy {
        TermStrategy::Recurrence => Decimal::one(),
        TermStrategy::ClosedFormSeed => closed_form_term(range.start(), working)?,
    };
    let mut a_sum = term.clone();
    let mut b_sum = term.mul_int(&BigInt::from(range.start()), working);

    for k in range.start() + 1..range.end() {
        cancel.check()?;
        let term_working = term_precision(&a_sum, &term, working);
        term = next_term(&term, k, &constants, term_working)?;
        let k = BigInt::from(k);
        a_sum = a_sum.add(&term, working);
        b_sum = b_sum.add(&term.mul_int(&k, working), working);
    }

    debug!(%range, ?strategy, working, "range summed");
    Ok(PartialSum { a_sum, b_sum })
}

/// Significant digits `term` needs so that its rounding stays below the last
/// working digit of `sum`.
fn term_precision(sum: &Decimal, term: &Decimal, working: u64) -> u64 {
    let below = (sum.top() - term.top()).max(0) as u64;
    (working + TERM_GUARD_DIGITS)
        .saturating_sub(below)
        .clamp(TERM_GUARD_DIGITS, working.max(TERM_GUARD_DIGITS))
}

/// `a_k` from `a_{k-1}`.
fn next_term(
    previous: &Decimal,
    k: u64,
    constants: &SeriesConstants,
    prec: u64,
) -> PiResult<Decimal> {
    let numerator = -(BigInt::from(6 * k - 5) * BigInt::from(2 * k - 1) * BigInt::from(6 * k - 1));
    let k = BigInt::from(k);
    let denominator = constants.c3_over_24.mul_int(&(&k * &k * &k), prec);
    previous
        .mul_int(&numerator, prec)
        .div(&denominator, prec)
}

/// `a_k` straight from its closed form.
fn closed_form_term(k: u64, working: u64) -> PiResult<Decimal> {
    let k_factorial = factorial(k);
    let numerator = factorial(6 * k);
    let denominator =
        factorial(3 * k) * &k_factorial * &k_factorial * &k_factorial * int_pow(C, 3 * k)?;

    let magnitude =
        Decimal::from(numerator).div(&Decimal::from(denominator), working + SEED_GUARD_DIGITS)?;
    let term = if k % 2 == 0 {
        magnitude
    } else {
        magnitude.negated()
    };
    Ok(term.rounded(working))
}
