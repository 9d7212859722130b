//! # Precision
//!
//! A requested precision counts decimal digits *after* the decimal point, so
//! a request for 10 digits returns `3.1415926535` (11 significant digits).
//! Every computation runs at a wider *working* precision that adds guard
//! digits; they absorb rounding error from division and square roots and are
//! cut off before a value is returned.
//!
//! ## Example
//!
//! ```rust
//! use pi_core::precision::Precision;
//!
//! let precision = Precision::new(50).unwrap();
//! assert_eq!(precision.significant_digits(), 51);
//! assert_eq!(precision.working(), 61);
//!
//! assert!(Precision::new(0).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PiError, PiResult};

/// Guard digits carried beyond the requested precision by default.
pub const DEFAULT_GUARD_DIGITS: u64 = 10;

/// Fewest guard digits a computation may run with.
pub const MIN_GUARD_DIGITS: u64 = 2;

/// Largest request accepted.
pub const MAX_DIGITS: u64 = 100_000_000;

/// Most guard digits a computation may carry.
pub const MAX_GUARD_DIGITS: u64 = 10_000;

/// Requested decimal digits plus the guard margin used internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    digits: u64,
    guard_digits: u64,
}

impl Precision {
    /// Validate a requested digit count.
    pub fn new(digits: i64) -> PiResult<Self> {
        if digits <= 0 {
            return Err(PiError::invalid_input(
                "precision",
                digits.to_string(),
                "Precision must be positive",
            ));
        }
        if digits as u64 > MAX_DIGITS {
            return Err(PiError::invalid_input(
                "precision",
                digits.to_string(),
                format!("Precision exceeds {} digits", MAX_DIGITS),
            ));
        }
        Ok(Precision {
            digits: digits as u64,
            guard_digits: DEFAULT_GUARD_DIGITS,
        })
    }

    /// Replace the guard margin.
    ///
    /// Values below [`MIN_GUARD_DIGITS`] are raised to it; values above
    /// [`MAX_GUARD_DIGITS`] are rejected.
    pub fn with_guard_digits(self, guard_digits: u64) -> PiResult<Self> {
        if guard_digits > MAX_GUARD_DIGITS {
            return Err(PiError::invalid_input(
                "guard_digits",
                guard_digits.to_string(),
                format!("At most {} guard digits are allowed", MAX_GUARD_DIGITS),
            ));
        }
        Ok(Precision {
            guard_digits: guard_digits.max(MIN_GUARD_DIGITS),
            ..self
        })
    }

    /// Digits after the decimal point the caller asked for.
    pub fn digits(&self) -> u64 {
        self.digits
    }

    pub fn guard_digits(&self) -> u64 {
        self.guard_digits
    }

    /// Significant digits of the returned value (the leading `3` included).
    pub fn significant_digits(&self) -> u64 {
        self.digits + 1
    }

    /// Significant digits carried by every intermediate value.
    pub fn working(&self) -> u64 {
        self.significant_digits() + self.guard_digits
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} digits (+{} guard)", self.digits, self.guard_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        for digits in [0, -1, -1000] {
            let err = Precision::new(digits).unwrap_err();
            assert!(err.is_configuration_error());
        }
    }

    #[test]
    fn test_rejects_oversized_request() {
        assert!(Precision::new(MAX_DIGITS as i64 + 1).is_err());
        assert!(Precision::new(MAX_DIGITS as i64).is_ok());
    }

    #[test]
    fn test_working_precision() {
        let precision = Precision::new(10).unwrap();
        assert_eq!(precision.digits(), 10);
        assert_eq!(precision.significant_digits(), 11);
        assert_eq!(precision.working(), 11 + DEFAULT_GUARD_DIGITS);
    }

    #[test]
    fn test_guard_digits_floor() {
        let precision = Precision::new(10).unwrap().with_guard_digits(0).unwrap();
        assert_eq!(precision.guard_digits(), MIN_GUARD_DIGITS);
        let precision = precision.with_guard_digits(25).unwrap();
        assert_eq!(precision.working(), 36);
    }

    #[test]
    fn test_guard_digits_ceiling() {
        let precision = Precision::new(10).unwrap();
        assert!(precision.with_guard_digits(MAX_GUARD_DIGITS).is_ok());
        for guard in [MAX_GUARD_DIGITS + 1, 4_294_967_296, u64::MAX] {
            let err = precision.with_guard_digits(guard).unwrap_err();
            assert!(err.is_configuration_error());
        }
    }

    #[test]
    fn test_display() {
        let precision = Precision::new(100).unwrap();
        assert_eq!(precision.to_string(), "100 digits (+10 guard)");
    }
}
