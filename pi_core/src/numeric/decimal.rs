//! Decimal floating-point values backed by `num-bigint`.
//!
//! A [`Decimal`] is `mantissa · 10^exponent`. Operations that can grow the
//! mantissa take a precision in significant decimal digits and round the
//! result half-up on the magnitude. The digit count used for rounding is a
//! cheap lower bound, so a rounded result keeps `prec` or `prec + 1` digits;
//! precision is always a floor, never a ceiling. [`Decimal::truncate_significant`]
//! is the exact counterpart used before values leave the engine.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::errors::{PiError, PiResult};

const LOG10_2: f64 = 0.301_029_995_663_981_2;
const LOG2_10: f64 = 3.321_928_094_887_362_3;

/// Arbitrary-precision decimal value.
#[derive(Debug, Clone)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

fn pow10(n: u64) -> BigUint {
    match u32::try_from(n) {
        Ok(n) => BigUint::from(10u32).pow(n),
        Err(_) => num_traits::pow(BigUint::from(10u32), n as usize),
    }
}

fn pow10_int(n: u64) -> BigInt {
    BigInt::from(pow10(n))
}

/// Lower bound on the number of decimal digits of `m` (1 for zero).
fn digits_lower_bound(m: &BigInt) -> u64 {
    let bits = m.bits();
    if bits <= 1 {
        return 1;
    }
    ((bits - 1) as f64 * LOG10_2 - 1e-9).floor().max(0.0) as u64 + 1
}

/// Exact number of decimal digits of `m` (1 for zero).
fn digits_exact(m: &BigInt) -> u64 {
    let mut digits = digits_lower_bound(m);
    while m.magnitude() >= &pow10(digits) {
        digits += 1;
    }
    digits
}

impl Decimal {
    pub fn zero() -> Self {
        Decimal {
            mantissa: BigInt::zero(),
            exponent: 0,
        }
    }

    pub fn one() -> Self {
        Decimal {
            mantissa: BigInt::one(),
            exponent: 0,
        }
    }

    pub fn from_bigint(mantissa: BigInt) -> Self {
        Decimal {
            mantissa,
            exponent: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn negated(&self) -> Self {
        Decimal {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
        }
    }

    /// Round half-up to at least `prec` significant digits.
    pub(crate) fn rounded(self, prec: u64) -> Self {
        let digits = digits_lower_bound(&self.mantissa);
        if digits <= prec {
            return self;
        }
        let drop = digits - prec;
        let divisor = pow10_int(drop);
        let (mut quotient, remainder) = self.mantissa.div_rem(&divisor);
        if remainder.abs() * BigInt::from(2u8) >= divisor {
            if self.mantissa.is_negative() {
                quotient -= BigInt::one();
            } else {
                quotient += BigInt::one();
            }
        }
        Decimal {
            mantissa: quotient,
            exponent: self.exponent + drop as i64,
        }
    }

    /// Drop everything past the first `prec` significant digits (toward zero).
    pub fn truncate_significant(&self, prec: u64) -> Self {
        let digits = digits_exact(&self.mantissa);
        if digits <= prec {
            return self.clone();
        }
        let drop = digits - prec;
        Decimal {
            mantissa: &self.mantissa / pow10_int(drop),
            exponent: self.exponent + drop as i64,
        }
    }

    /// Drop digits below `10^floor`.
    fn clipped(&self, floor: i64) -> Self {
        if self.exponent >= floor {
            return self.clone();
        }
        let drop = (floor - self.exponent) as u64;
        Decimal {
            mantissa: &self.mantissa / pow10_int(drop),
            exponent: floor,
        }
    }

    /// Position just above the leading digit (lower bound).
    pub(crate) fn top(&self) -> i64 {
        self.exponent + digits_lower_bound(&self.mantissa) as i64
    }

    /// Exact sum, no rounding. Associative and commutative.
    pub fn add_exact(&self, other: &Decimal) -> Decimal {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => Decimal {
                mantissa: &self.mantissa + &other.mantissa,
                exponent: self.exponent,
            },
            Ordering::Greater => {
                let shift = (self.exponent - other.exponent) as u64;
                Decimal {
                    mantissa: &self.mantissa * pow10_int(shift) + &other.mantissa,
                    exponent: other.exponent,
                }
            }
            Ordering::Less => other.add_exact(self),
        }
    }

    /// Sum rounded to `prec` significant digits.
    pub fn add(&self, other: &Decimal, prec: u64) -> Decimal {
        if self.is_zero() {
            return other.clone().rounded(prec);
        }
        if other.is_zero() {
            return self.clone().rounded(prec);
        }
        // Digits this far below the larger operand cannot reach the result.
        let floor = self.top().max(other.top()) - prec as i64 - 3;
        self.clipped(floor)
            .add_exact(&other.clipped(floor))
            .rounded(prec)
    }

    pub fn sub(&self, other: &Decimal, prec: u64) -> Decimal {
        self.add(&other.negated(), prec)
    }

    pub fn mul(&self, other: &Decimal, prec: u64) -> Decimal {
        Decimal {
            mantissa: &self.mantissa * &other.mantissa,
            exponent: self.exponent + other.exponent,
        }
        .rounded(prec)
    }

    pub fn mul_int(&self, factor: &BigInt, prec: u64) -> Decimal {
        Decimal {
            mantissa: &self.mantissa * factor,
            exponent: self.exponent,
        }
        .rounded(prec)
    }

    pub fn div(&self, divisor: &Decimal, prec: u64) -> PiResult<Decimal> {
        if divisor.is_zero() {
            return Err(PiError::computation_failed("divide", "division by zero"));
        }
        if self.is_zero() {
            return Ok(Decimal::zero());
        }
        let numerator_digits = digits_lower_bound(&self.mantissa) as i64;
        let divisor_digits = digits_lower_bound(&divisor.mantissa) as i64 + 1;
        // Widen the numerator so the integer quotient has at least prec + 1 digits.
        let shift = (prec as i64 + 2 + divisor_digits - numerator_digits).max(0) as u64;
        let quotient = (&self.mantissa * pow10_int(shift)) / &divisor.mantissa;
        Ok(Decimal {
            mantissa: quotient,
            exponent: self.exponent - shift as i64 - divisor.exponent,
        }
        .rounded(prec))
    }

    pub fn div_int(&self, divisor: &BigInt, prec: u64) -> PiResult<Decimal> {
        self.div(&Decimal::from_bigint(divisor.clone()), prec)
    }

    pub fn sqrt(&self, prec: u64) -> PiResult<Decimal> {
        if self.is_negative() {
            return Err(PiError::computation_failed(
                "sqrt",
                format!("negative operand {}", self),
            ));
        }
        if self.is_zero() {
            return Ok(Decimal::zero());
        }
        let digits = digits_lower_bound(&self.mantissa);
        let mut shift = (2 * (prec + 2)).saturating_sub(digits);
        if (self.exponent - shift as i64).rem_euclid(2) != 0 {
            shift += 1;
        }
        let root = (&self.mantissa * pow10_int(shift)).sqrt();
        Ok(Decimal {
            mantissa: root,
            exponent: (self.exponent - shift as i64) / 2,
        }
        .rounded(prec))
    }

    /// Base-10 logarithm to `prec` significant digits.
    ///
    /// The integer part comes from the digit count; fractional bits are read
    /// off by repeated squaring of the normalized value in `[1, 10)`.
    pub fn log10(&self, prec: u64) -> PiResult<Decimal> {
        if self.is_negative() || self.is_zero() {
            return Err(PiError::computation_failed(
                "log10",
                format!("non-positive operand {}", self),
            ));
        }
        let digits = digits_exact(&self.mantissa);
        let characteristic = self.exponent + digits as i64 - 1;

        // Each squaring doubles the relative error, so carry twice the digits.
        let inner = 2 * prec + 10;
        let ten = Decimal::from(10u64);
        let mut y = Decimal {
            mantissa: self.mantissa.clone(),
            exponent: 1 - digits as i64,
        };
        let bits = (prec as f64 * LOG2_10).ceil() as u64 + 8;
        let mut fraction = BigUint::zero();
        for _ in 0..bits {
            y = y.mul(&y, inner);
            fraction <<= 1usize;
            if y.cmp_value(&ten) != Ordering::Less {
                y.exponent -= 1;
                fraction += 1u32;
            }
        }
        let fraction = Decimal {
            mantissa: BigInt::from((fraction * pow10(prec)) >> (bits as usize)),
            exponent: -(prec as i64),
        };
        Ok(Decimal::from(characteristic).add(&fraction, prec))
    }

    /// Numeric comparison.
    pub fn cmp_value(&self, other: &Decimal) -> Ordering {
        match self.add_exact(&other.negated()).mantissa.sign() {
            Sign::Minus => Ordering::Less,
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => Ordering::Greater,
        }
    }

    /// Smallest integer not below this value.
    pub fn ceil_to_u64(&self) -> PiResult<u64> {
        let integer = if self.exponent >= 0 {
            &self.mantissa * pow10_int(self.exponent as u64)
        } else {
            let scale = pow10_int(self.exponent.unsigned_abs());
            let (quotient, remainder) = self.mantissa.div_rem(&scale);
            if remainder.is_positive() {
                quotient + BigInt::one()
            } else {
                quotient
            }
        };
        integer.to_u64().ok_or_else(|| {
            PiError::computation_failed("ceil", format!("{} does not fit in u64", integer))
        })
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal::from_bigint(BigInt::from(value))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::from_bigint(BigInt::from(value))
    }
}

impl From<BigUint> for Decimal {
    fn from(value: BigUint) -> Self {
        Decimal::from_bigint(BigInt::from(value))
    }
}

/// Plain positional notation, never scientific.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.magnitude().to_string();
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        if self.exponent >= 0 {
            return write!(f, "{}{}{}", sign, digits, "0".repeat(self.exponent as usize));
        }
        let fraction_len = self.exponent.unsigned_abs() as usize;
        if digits.len() > fraction_len {
            let (int_part, fraction) = digits.split_at(digits.len() - fraction_len);
            write!(f, "{}{}.{}", sign, int_part, fraction)
        } else {
            write!(
                f,
                "{}0.{}{}",
                sign,
                "0".repeat(fraction_len - digits.len()),
                digits
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(mantissa: i64, exponent: i64) -> Decimal {
        Decimal {
            mantissa: BigInt::from(mantissa),
            exponent,
        }
    }

    #[test]
    fn test_digit_counts() {
        assert_eq!(digits_exact(&BigInt::zero()), 1);
        assert_eq!(digits_exact(&BigInt::from(9)), 1);
        assert_eq!(digits_exact(&BigInt::from(10)), 2);
        assert_eq!(digits_exact(&BigInt::from(-99_999)), 5);
        assert_eq!(digits_exact(&pow10_int(40)), 41);
        for n in [1u64, 7, 1023, 1024, 8191, 123_456_789, u64::MAX] {
            let m = BigInt::from(n);
            assert!(digits_lower_bound(&m) <= digits_exact(&m));
            assert!(digits_lower_bound(&m) + 1 >= digits_exact(&m));
        }
    }

    #[test]
    fn test_rounding_half_up() {
        // 8191 has a tight digit bound, so rounding to 2 digits drops exactly 2.
        assert_eq!(dec(8191, 0).rounded(2).to_string(), "8200");
        assert_eq!(dec(-8191, 0).rounded(2).to_string(), "-8200");
        assert_eq!(dec(8149, 0).rounded(2).to_string(), "8100");
        assert_eq!(dec(42, 0).rounded(5).to_string(), "42");
    }

    #[test]
    fn test_truncate_significant() {
        assert_eq!(dec(31_415_926, -7).truncate_significant(3).to_string(), "3.14");
        assert_eq!(dec(-31_999, -4).truncate_significant(2).to_string(), "-3.1");
        assert_eq!(dec(5, -1).truncate_significant(10).to_string(), "0.5");
    }

    #[test]
    fn test_display() {
        assert_eq!(dec(12, 3).to_string(), "12000");
        assert_eq!(dec(12, -1).to_string(), "1.2");
        assert_eq!(dec(12, -4).to_string(), "0.0012");
        assert_eq!(dec(-5, -2).to_string(), "-0.05");
        assert_eq!(Decimal::zero().to_string(), "0");
    }

    #[test]
    fn test_add_exact_aligns_exponents() {
        let sum = dec(1, 0).add_exact(&dec(25, -3));
        assert_eq!(sum.to_string(), "1.025");
        assert_eq!(dec(25, -3).add_exact(&dec(1, 0)).to_string(), "1.025");
        assert_eq!(dec(3, 2).add_exact(&dec(-3, 2)).cmp_value(&Decimal::zero()), Ordering::Equal);
    }

    #[test]
    fn test_add_ignores_negligible_operand() {
        let tiny = dec(1, -500);
        let sum = Decimal::one().add(&tiny, 20);
        assert_eq!(sum.cmp_value(&Decimal::one()), Ordering::Equal);
    }

    #[test]
    fn test_sub() {
        let diff = dec(5, 0).sub(&dec(75, -1), 10);
        assert_eq!(diff.to_string(), "-2.5");
    }

    #[test]
    fn test_division() {
        let third = Decimal::one().div(&dec(3, 0), 10).unwrap();
        assert_eq!(third.truncate_significant(10).to_string(), "0.3333333333");

        let seventh = dec(22, 0).div(&dec(7, 0), 30).unwrap();
        assert_eq!(
            seventh.truncate_significant(25).to_string(),
            "3.142857142857142857142857"
        );
    }

    #[test]
    fn test_division_by_zero_fails() {
        let err = Decimal::one().div(&Decimal::zero(), 10).unwrap_err();
        assert_eq!(err.error_code(), "COMPUTATION_FAILED");
    }

    #[test]
    fn test_sqrt() {
        let root = Decimal::from(2u64).sqrt(60).unwrap();
        assert_eq!(
            root.truncate_significant(50).to_string(),
            "1.4142135623730950488016887242096980785696718753769"
        );
        let root = Decimal::from(10005u64).sqrt(30).unwrap();
        assert_eq!(root.truncate_significant(12).to_string(), "100.024996875");
        assert!(dec(-4, 0).sqrt(10).is_err());
    }

    #[test]
    fn test_sqrt_of_small_value() {
        let root = dec(25, -4).sqrt(10).unwrap();
        assert_eq!(root.cmp_value(&dec(5, -2)), Ordering::Equal);
    }

    #[test]
    fn test_log10() {
        let exact = Decimal::from(1000u64).log10(20).unwrap();
        assert_eq!(exact.cmp_value(&Decimal::from(3u64)), Ordering::Equal);

        let log2 = Decimal::from(2u64).log10(30).unwrap();
        assert_eq!(
            log2.truncate_significant(25).to_string(),
            "0.3010299956639811952137388"
        );

        let small = dec(2, -3).log10(20).unwrap();
        assert_eq!(small.truncate_significant(10).to_string(), "-2.698970004");
        assert!(Decimal::zero().log10(10).is_err());
    }

    #[test]
    fn test_ceil_to_u64() {
        assert_eq!(dec(141, -1).ceil_to_u64().unwrap(), 15);
        assert_eq!(dec(140, -1).ceil_to_u64().unwrap(), 14);
        assert_eq!(dec(3, 2).ceil_to_u64().unwrap(), 300);
        assert!(dec(-15, -1).ceil_to_u64().is_err());
    }
}
