//! # Result Merger
//!
//! Folds partial sums into π. The two running totals are accumulated with
//! exact decimal addition, so the order in which ranges finished (or were
//! listed) cannot change a single digit of the result.

use num_bigint::BigInt;
use tracing::debug;

use super::{PartialSum, A_WEIGHT, B_WEIGHT, NUMERATOR_RADICAND, NUMERATOR_SCALE};
use crate::errors::PiResult;
use crate::numeric::Decimal;
use crate::precision::Precision;

/// Combine `partials` into π, truncated to the requested digits.
///
/// ```text
///  π = 426880 · sqrt(10005) / (13591409 · Σa + 545140134 · Σb)
/// ```
pub fn merge(partials: &[PartialSum], precision: &Precision) -> PiResult<Decimal> {
    let working = precision.working();

    let (a_total, b_total) = partials.iter().fold(
        (Decimal::zero(), Decimal::zero()),
        |(a_total, b_total), partial| {
            (
                a_total.add_exact(&partial.a_sum),
                b_total.add_exact(&partial.b_sum),
            )
        },
    );

    let total = a_total.mul_int(&BigInt::from(A_WEIGHT), working).add(
        &b_total.mul_int(&BigInt::from(B_WEIGHT), working),
        working,
    );
    let root = Decimal::from(NUMERATOR_RADICAND).sqrt(working)?;
    let pi = root
        .mul_int(&BigInt::from(NUMERATOR_SCALE), working)
        .div(&total, working)?;

    debug!(partials = partials.len(), working, "merged partial sums");
    Ok(pi.truncate_significant(precision.significant_digits()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{compute_range, plan};

    const PI_100: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

    fn partials(digits: i64, ranges: i64) -> (Precision, Vec<PartialSum>) {
        let precision = Precision::new(digits).unwrap();
        let partials = plan(ranges, &precision)
            .unwrap()
            .iter()
            .map(|range| compute_range(range, &precision).unwrap())
            .collect();
        (precision, partials)
    }

    #[test]
    fn test_merge_single_partial() {
        let (precision, partials) = partials(50, 1);
        let pi = merge(&partials, &precision).unwrap();
        assert_eq!(
            pi.to_string(),
            "3.14159265358979323846264338327950288419716939937510"
        );
    }

    #[test]
    fn test_merge_matches_known_digits() {
        let (precision, partials) = partials(100, 5);
        let pi = merge(&partials, &precision).unwrap();
        assert_eq!(pi.to_string(), PI_100);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let (precision, mut partials) = partials(400, 7);
        let expected = merge(&partials, &precision).unwrap().to_string();

        partials.reverse();
        assert_eq!(merge(&partials, &precision).unwrap().to_string(), expected);

        // A fixed set of rotations and swaps standing in for a shuffle.
        for shift in 1..partials.len() {
            partials.rotate_left(shift);
            partials.swap(0, shift);
            assert_eq!(merge(&partials, &precision).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_merge_ignores_empty_partials() {
        let (precision, mut partials) = partials(30, 2);
        let expected = merge(&partials, &precision).unwrap().to_string();
        partials.push(PartialSum::zero());
        partials.insert(0, PartialSum::zero());
        assert_eq!(merge(&partials, &precision).unwrap().to_string(), expected);
    }

    #[test]
    fn test_merge_of_nothing_fails() {
        let precision = Precision::new(10).unwrap();
        let err = merge(&[], &precision).unwrap_err();
        assert_eq!(err.error_code(), "COMPUTATION_FAILED");
    }
}
