//! Checked fixed-point arithmetic shared by the program and its clients
//!
//! Conversions between principal and voting power multiply two u128
//! quantities before dividing, so the intermediate product is carried in
//! 256 bits. Results that do not fit back into u128 are errors, never
//! silent truncation.

use crate::error::GvTokenError;

const MASK64: u128 = (1u128 << 64) - 1;

/// Full 256-bit product of two u128 values as (hi, lo) halves
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & MASK64);
    let (b_hi, b_lo) = (b >> 64, b & MASK64);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (lo, lo_carry) = ll.overflowing_add((mid & MASK64) << 64);

    let mut hi = hh + (mid >> 64) + lo_carry as u128;
    if mid_carry {
        hi += 1u128 << 64;
    }
    (hi, lo)
}

/// Divide the 256-bit value (hi, lo) by `denom`, returning the u128
/// quotient. `None` when the quotient does not fit or `denom` is zero.
fn div_wide(hi: u128, lo: u128, denom: u128) -> Option<u128> {
    if denom == 0 || hi >= denom {
        return None;
    }
    if hi == 0 {
        return Some(lo / denom);
    }
    // Restoring long division, one bit of `lo` at a time. The remainder
    // stays below `denom`, so the only overflow on shift is the single
    // carried-out bit.
    let mut rem = hi;
    let mut quo = 0u128;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= denom {
            rem = rem.wrapping_sub(denom);
            quo |= 1 << i;
        }
    }
    Some(quo)
}

/// Floor of `a * b / denom`, exact for all u128 inputs.
///
/// Errors on a zero denominator or when the quotient exceeds u128.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Result<u128, GvTokenError> {
    if denom == 0 {
        return Err(GvTokenError::MathOverflow);
    }
    if let Some(prod) = a.checked_mul(b) {
        return Ok(prod / denom);
    }
    let (hi, lo) = mul_wide(a, b);
    div_wide(hi, lo, denom).ok_or(GvTokenError::MathOverflow)
}

/// Checked add for ledger amounts
pub fn checked_add(a: u128, b: u128) -> Result<u128, GvTokenError> {
    a.checked_add(b).ok_or(GvTokenError::MathOverflow)
}

/// Checked sub for ledger amounts
pub fn checked_sub(a: u128, b: u128) -> Result<u128, GvTokenError> {
    a.checked_sub(b).ok_or(GvTokenError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_exact_small() {
        assert_eq!(mul_div(6, 7, 3).unwrap(), 14);
        assert_eq!(mul_div(0, 123, 9).unwrap(), 0);
        assert_eq!(mul_div(10, 10, 3).unwrap(), 33);
    }

    #[test]
    fn test_mul_div_wide_product() {
        // a * b overflows u128 but the quotient fits
        let a = u128::MAX / 2;
        let d = 1_000_000u128;
        assert_eq!(mul_div(a, d, d).unwrap(), a);

        let x = 1u128 << 100;
        assert_eq!(mul_div(x, x, x).unwrap(), x);
    }

    #[test]
    fn test_mul_div_wide_with_remainders() {
        // (2^100 + 3) * (2^100 + 5) / (2^100 + 7), checked against the
        // identity q*d <= a*b < (q+1)*d via the wide product
        let a = (1u128 << 100) + 3;
        let b = (1u128 << 100) + 5;
        let d = (1u128 << 100) + 7;
        let q = mul_div(a, b, d).unwrap();

        let (ph, pl) = mul_wide(a, b);
        let (qh, ql) = mul_wide(q, d);
        // q*d <= a*b
        assert!(qh < ph || (qh == ph && ql <= pl));
        let (rh, rl) = mul_wide(q + 1, d);
        // (q+1)*d > a*b
        assert!(rh > ph || (rh == ph && rl > pl));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(mul_div(1, 1, 0), Err(GvTokenError::MathOverflow));
    }

    #[test]
    fn test_mul_div_unrepresentable() {
        assert!(mul_div(u128::MAX, 2, 1).is_err());
        assert!(mul_div(u128::MAX, u128::MAX, 2).is_err());
    }

    #[test]
    fn test_mul_wide_known_values() {
        assert_eq!(mul_wide(0, u128::MAX), (0, 0));
        assert_eq!(mul_wide(1, u128::MAX), (0, u128::MAX));
        // (2^64)^2 = 2^128
        assert_eq!(mul_wide(1u128 << 64, 1u128 << 64), (1, 0));
        // MAX * MAX = 2^256 - 2^129 + 1
        assert_eq!(mul_wide(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
    }

    #[test]
    fn test_checked_helpers() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert!(checked_add(u128::MAX, 1).is_err());
        assert_eq!(checked_sub(5, 2).unwrap(), 3);
        assert!(checked_sub(2, 5).is_err());
    }
}
