//! Exact integer helpers.

use num_bigint::BigUint;
use num_traits::One;

use crate::errors::{PiError, PiResult};

/// Exact `n!`.
pub fn factorial(n: u64) -> BigUint {
    if n < 2 {
        return BigUint::one();
    }
    product_range(2, n + 1)
}

/// Product of `lo..hi`, split in halves so both operands of each
/// multiplication have similar sizes.
fn product_range(lo: u64, hi: u64) -> BigUint {
    match hi - lo {
        0 => BigUint::one(),
        1 => BigUint::from(lo),
        2 => BigUint::from(lo) * BigUint::from(lo + 1),
        len => {
            let mid = lo + len / 2;
            product_range(lo, mid) * product_range(mid, hi)
        }
    }
}

/// Exact `base^exp`.
pub fn int_pow(base: u64, exp: u64) -> PiResult<BigUint> {
    let exp = u32::try_from(exp).map_err(|_| {
        PiError::computation_failed("int_pow", format!("exponent {} is too large", exp))
    })?;
    Ok(BigUint::from(base).pow(exp))
}
