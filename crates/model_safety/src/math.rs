//! Total arithmetic helpers - no unwrap, no panics

/// Saturating add
pub fn add_amt(a: u128, b: u128) -> u128 {
    a.saturating_add(b)
}

/// Saturating sub (floors at zero)
pub fn sub_amt(a: u128, b: u128) -> u128 {
    a.saturating_sub(b)
}

/// Minimum of two amounts
pub fn min_amt(a: u128, b: u128) -> u128 {
    if a < b {
        a
    } else {
        b
    }
}

/// Floor of `a * b / d`; total: returns 0 on a zero divisor and
/// saturates when the result cannot be represented.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> u128 {
    if d == 0 {
        return 0;
    }
    if let Some(prod) = a.checked_mul(b) {
        return prod / d;
    }
    // a*b/d == (a/d)*b + (a%d)*b/d
    let q = a / d;
    let r = a % d;
    let head = match q.checked_mul(b) {
        Some(h) => h,
        None => return u128::MAX,
    };
    let tail = match r.checked_mul(b) {
        Some(t) => t / d,
        None => return u128::MAX,
    };
    head.saturating_add(tail)
}
