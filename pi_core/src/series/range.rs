//! # Term Ranges
//!
//! A [`Range`] is a half-open slice `[start, end)` of term indices. The
//! planner decides how many terms a precision needs and cuts `[0, terms)`
//! into contiguous, non-overlapping ranges, one per worker.
//!
//! ## Example
//!
//! ```rust
//! use pi_core::precision::Precision;
//! use pi_core::series::range::{plan, term_count, Range};
//!
//! let precision = Precision::new(1000).unwrap();
//! let ranges = plan(4, &precision).unwrap();
//!
//! assert_eq!(ranges.len(), 4);
//! assert_eq!(ranges[0].start(), 0);
//! assert_eq!(ranges[3].end(), term_count(&precision).unwrap());
//!
//! assert!(Range::new(5, 2).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SeriesConstants, LOG_DIGITS_CAP};
use crate::errors::{PiError, PiResult};
use crate::numeric::Decimal;
use crate::precision::Precision;

/// Half-open interval of term indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    start: u64,
    end: u64,
}

impl Range {
    /// Build a range from caller-supplied bounds.
    ///
    /// Negative bounds and `end < start` are rejected; bounds are never swapped.
    pub fn new(start: i64, end: i64) -> PiResult<Self> {
        if start < 0 || end < 0 {
            return Err(PiError::invalid_input(
                "range",
                format!("[{}, {})", start, end),
                "Bounds must not be negative",
            ));
        }
        if end < start {
            return Err(PiError::invalid_input(
                "range",
                format!("[{}, {})", start, end),
                "Upper bound must not be below lower bound",
            ));
        }
        Ok(Range {
            start: start as u64,
            end: end as u64,
        })
    }

    /// Bounds already known to be ordered.
    pub(crate) fn from_bounds(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Range { start, end }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Number of series terms needed for `precision`.
///
/// Uses the working precision, so the truncated tail stays below one unit of
/// the last guard digit.
pub fn term_count(precision: &Precision) -> PiResult<u64> {
    let constants = SeriesConstants::new(precision.working())?;
    let digits_per_term = constants.digits_per_term()?;
    Decimal::from(precision.working())
        .div(&digits_per_term, LOG_DIGITS_CAP)?
        .ceil_to_u64()
}

/// Split `[0, term_count(precision))` into `number_of_ranges` contiguous ranges.
///
/// Boundary `i` sits at `floor(i · terms / number_of_ranges)`, so range sizes
/// differ by at most one and the last range always ends at `terms`. Asking
/// for more ranges than there are terms yields some empty ranges.
pub fn plan(number_of_ranges: i64, precision: &Precision) -> PiResult<Vec<Range>> {
    if number_of_ranges <= 0 {
        return Err(PiError::invalid_input(
            "number_of_ranges",
            number_of_ranges.to_string(),
            "Number of ranges must be positive",
        ));
    }
    let count = number_of_ranges as u64;
    let terms = term_count(precision)?;
    let boundary = |i: u64| ((i as u128 * terms as u128) / count as u128).min(terms as u128) as u64;

    let ranges: Vec<Range> = (0..count)
        .map(|i| Range::from_bounds(boundary(i), boundary(i + 1)))
        .collect();

    debug!(
        terms,
        ranges = ranges.len(),
        precision = precision.digits(),
        "planned term ranges"
    );
    Ok(ranges)
}
