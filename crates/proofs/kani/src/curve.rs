//! Growth-curve proofs

use kani::{any, assume};
use model_safety::growth::{earned, MAX_GROW};

/// A deposit earns nothing at age zero and exactly its amount once
/// matured
#[kani::proof]
fn curve_endpoints() {
    let amount: u128 = any();
    assume(amount < u128::MAX / 2);

    assert_eq!(earned(amount, 0), 0);
    assert_eq!(earned(amount, MAX_GROW), amount);

    let beyond: u32 = any();
    assume(beyond >= MAX_GROW);
    assert_eq!(earned(amount, beyond), amount);
}

/// Earned power is monotone in age and never exceeds the amount
#[kani::proof]
fn curve_monotone_and_bounded() {
    let amount: u128 = any();
    assume(amount < u128::MAX / 2);

    let a: u32 = any();
    let b: u32 = any();
    assume(a <= b);

    let e_a = earned(amount, a);
    let e_b = earned(amount, b);
    kani::assert(e_a <= e_b, "earned power must be monotone in age");
    kani::assert(e_b <= amount, "earned power is bounded by the amount");
}
