//! Deposit instructions
//!
//! A regular deposit starts its growth clock at the current timestamp.
//! The proof-gated variant lets verified legacy holders start earlier;
//! the proof itself is checked by the external proof system against the
//! governance-set root, and its outcome reaches this program as the
//! proof authority's co-signature.

use crate::state::{CoreState, UserAccount};
use growvote_common::GvTokenError;
use pinocchio::msg;

/// Deposit `amount`; growth starts at `now`.
///
/// The base-asset transfer into the program vault travels in the same
/// transaction through the token program.
pub fn process_deposit(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
    now: u32,
) -> Result<(), GvTokenError> {
    user.push_deposit(amount, now)?;
    core.note_deposit(amount)?;
    msg!("Deposit recorded");
    Ok(())
}

/// Deposit `amount` with a verified earlier start timestamp.
pub fn process_deposit_with_start(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
    start: u32,
    now: u32,
) -> Result<(), GvTokenError> {
    if start > now {
        return Err(GvTokenError::StartInFuture);
    }
    user.push_deposit(amount, start)?;
    core.note_deposit(amount)?;
    msg!("Legacy deposit recorded");
    Ok(())
}
