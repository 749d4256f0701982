//! Two-phase withdrawal: request, then finalize after the delay
//!
//! A request sizes the exit in voting-power terms at the pro-rata
//! conversion rate, unwinds pot collateral if the exit is not covered by
//! unencumbered power, pops the ledger LIFO, shrinks the global supply,
//! and reconciles the delegated snapshot — in that order, all before the
//! request is recorded. Finalize only releases the base asset.

use crate::math::gv_value;
use crate::state::{CoreState, UserAccount};
use growvote_common::{checked_add, checked_sub, GvTokenError};
use pinocchio::msg;

/// Request withdrawal of `amount` base-asset units.
///
/// Accumulates into the user's single outstanding request; the delay
/// clock restarts for the combined amount.
pub fn process_request_withdrawal(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
    now: u32,
) -> Result<(), GvTokenError> {
    if amount == 0 {
        return Err(GvTokenError::ZeroAmount);
    }
    if amount > user.deposit_total {
        return Err(GvTokenError::InsufficientDeposits);
    }

    let (deposit_balance, accrued) = user.earned_power(now)?;
    let balance = checked_add(deposit_balance, accrued)?;
    let gv_amount = gv_value(amount, deposit_balance, accrued)?;

    // Free pot collateral when the exit exceeds unencumbered power, so
    // the user never has to unwind pot positions by hand first
    let shortfall = user.collateral_shortfall(gv_amount, balance);
    if shortfall > 0 {
        user.return_from_pot(shortfall)?;
        core.note_pot_withdrawal(shortfall)?;
        msg!("Pot collateral released for withdrawal");
    }

    user.pop_for_withdrawal(amount)?;
    core.note_withdrawal(amount, gv_amount)?;

    // The external tracker can never hold more delegated votes than the
    // remaining balance supports
    let balance_after = checked_sub(balance, gv_amount.min(balance))?;
    let moved = user.reconcile_delegation(balance_after);
    if moved > 0 {
        msg!("Excess delegated votes returned to the zero delegate");
    }

    user.accumulate_withdrawal(amount, now, core.withdrawal_delay)?;
    msg!("Withdrawal requested");
    Ok(())
}

/// Finalize the outstanding request once its delay has elapsed.
///
/// Returns the base-asset amount the token leg must transfer back to
/// the user.
pub fn process_finalize_withdrawal(
    user: &mut UserAccount,
    now: u32,
) -> Result<u128, GvTokenError> {
    let amount = user.take_finalized(now)?;
    msg!("Withdrawal finalized");
    Ok(amount)
}
