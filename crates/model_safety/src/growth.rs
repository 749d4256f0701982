//! Growth curve and conversion math over the pure model

use crate::math::*;
use crate::state::*;

/// Seconds per week
pub const WEEK: u32 = 7 * 24 * 60 * 60;

/// Maturation window (52 weeks)
pub const MAX_GROW: u32 = 52 * WEEK;

/// Minimum withdrawal delay (2 weeks)
pub const MIN_WITHDRAWAL_DELAY: u32 = 2 * WEEK;

/// Staking percentages are hundred-thousandths
pub const PERCENT_DENOM: u32 = 100_000;

/// Voting power earned by one deposit at age `age`
pub fn earned(amount: u128, age: u32) -> u128 {
    if age >= MAX_GROW {
        return amount;
    }
    mul_div_floor(amount, age as u128, MAX_GROW as u128)
}

/// Deposit balance and accrued power for a user at `now`.
///
/// Scans newest-first; the first matured entry ends the scan and the
/// remaining principal is credited as matured power in one step.
pub fn earned_power(user: &User, now: u32) -> (u128, u128) {
    let mut accrued: u128 = 0;
    let mut growing: u128 = 0;
    let mut hit_matured = false;

    for dep in user.deposits.iter().rev() {
        let age = now.saturating_sub(dep.start);
        if age >= MAX_GROW {
            hit_matured = true;
            break;
        }
        accrued = add_amt(accrued, earned(dep.amount, age));
        growing = add_amt(growing, dep.amount);
    }
    if hit_matured {
        accrued = add_amt(accrued, sub_amt(user.deposit_total, growing));
    }
    (user.deposit_total, accrued)
}

/// Total voting power for a user at `now`
pub fn balance(user: &User, now: u32) -> u128 {
    let (deposit_balance, accrued) = earned_power(user, now);
    add_amt(deposit_balance, accrued)
}

/// Voting-power equivalent of withdrawing `base_amount`; zero when the
/// user has no deposits
pub fn gv_value(base_amount: u128, deposit_balance: u128, accrued: u128) -> u128 {
    mul_div_floor(
        base_amount,
        add_amt(deposit_balance, accrued),
        deposit_balance,
    )
}

/// Absolute voting power behind a stake percentage
pub fn percent_to_absolute(percent: u32, bal: u128, bribed: u128) -> u128 {
    mul_div_floor(percent as u128, sub_amt(bal, bribed), PERCENT_DENOM as u128)
}
