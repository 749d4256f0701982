//! Vote delegation entry point
//!
//! Delegates the user's entire current voting power to a delegatee. The
//! payload carries a deadline and the user's strictly-increasing nonce
//! so that relayed (gas-less) delegations cannot be replayed or held
//! back and submitted later; the signature itself is the transaction
//! signature. The external vote tracker follows the moves this handler
//! reports.

use crate::state::UserAccount;
use growvote_common::GvTokenError;
use pinocchio::{msg, pubkey::Pubkey};
use pinocchio_log::log;

/// Delegate all current voting power to `delegatee`.
pub fn process_delegate(
    user: &mut UserAccount,
    delegatee: Pubkey,
    nonce: u64,
    deadline: u32,
    now: u32,
) -> Result<(), GvTokenError> {
    if now > deadline {
        return Err(GvTokenError::DeadlineExpired);
    }
    if nonce != user.nonce {
        return Err(GvTokenError::NonceMismatch);
    }
    user.nonce += 1;

    let balance = user.balance(now)?;
    if user.delegated > 0 {
        msg!("Moving delegated votes to new delegatee");
    }
    user.delegated = balance;
    user.delegatee = delegatee;
    log!("delegated; nonce now {}", user.nonce);
    Ok(())
}
