//! Voting-power growth curve and conversion math
//!
//! A deposit's voting power grows linearly with age from zero to the
//! deposited amount over `MAX_GROW`, then stops. Withdrawals convert a
//! base-asset amount into voting power pro rata, so giving up X% of
//! principal relinquishes X% of principal plus accrued growth.

use growvote_common::{mul_div, GvTokenError, MAX_GROW, PERCENT_DENOM, SCALE};

/// Voting power earned by a single deposit of `amount` at age `age`
/// seconds.
///
/// Exact floor of `amount * age / MAX_GROW`; saturates at `amount` once
/// the deposit has fully matured.
pub fn earned(amount: u128, age: u32) -> Result<u128, GvTokenError> {
    if age >= MAX_GROW {
        return Ok(amount);
    }
    mul_div(amount, age as u128, MAX_GROW as u128)
}

/// Pro-rata conversion rate from base-asset units to voting-power units,
/// scaled by 1e18: `(deposit_balance + earned_power) / deposit_balance`.
pub fn conversion_rate(
    deposit_balance: u128,
    earned_power: u128,
) -> Result<u128, GvTokenError> {
    let total = deposit_balance
        .checked_add(earned_power)
        .ok_or(GvTokenError::MathOverflow)?;
    mul_div(total, SCALE, deposit_balance)
}

/// Voting-power equivalent of withdrawing `base_amount` of principal.
///
/// `base_amount * (deposit_balance + earned_power) / deposit_balance`,
/// computed exactly. Fails when `deposit_balance` is zero.
pub fn gv_value(
    base_amount: u128,
    deposit_balance: u128,
    earned_power: u128,
) -> Result<u128, GvTokenError> {
    let total = deposit_balance
        .checked_add(earned_power)
        .ok_or(GvTokenError::MathOverflow)?;
    mul_div(base_amount, total, deposit_balance)
}

/// Absolute voting power represented by a stake percentage.
///
/// Percentages apply to the balance not already diverted to the rewards
/// pot: `percent * (balance - bribed) / PERCENT_DENOM`.
pub fn percent_to_absolute(
    percent: u32,
    balance: u128,
    bribed: u128,
) -> Result<u128, GvTokenError> {
    let free = balance
        .checked_sub(bribed)
        .ok_or(GvTokenError::MathOverflow)?;
    mul_div(percent as u128, free, PERCENT_DENOM as u128)
}
