//! Rewards-pot gateway instructions
//!
//! The pot itself is an external system: it accounts for yield on the
//! diverted voting power and its operator co-signs reward claims with
//! the attested amount. This program only tracks how much of each
//! user's voting power is diverted and enforces the balance bound at
//! the moment of diversion.

use crate::state::{CoreState, UserAccount};
use growvote_common::GvTokenError;
use pinocchio::msg;

/// Divert `amount` of voting power to the rewards pot.
pub fn process_pot_deposit(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
    now: u32,
) -> Result<(), GvTokenError> {
    let balance = user.balance(now)?;
    user.divert_to_pot(amount, balance)?;
    core.note_pot_deposit(amount)?;
    msg!("Voting power diverted to pot");
    Ok(())
}

/// Pull `amount` of diverted voting power back from the pot.
pub fn process_pot_withdraw(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
) -> Result<(), GvTokenError> {
    user.return_from_pot(amount)?;
    core.note_pot_withdrawal(amount)?;
    msg!("Voting power returned from pot");
    Ok(())
}

/// Claim `amount` of pot rewards for the user.
///
/// With `also_deposit`, the reward is locked straight back into the
/// ledger as a fresh deposit starting now; otherwise the reward leaves
/// through the token leg of the transaction.
pub fn process_claim_reward(
    core: &mut CoreState,
    user: &mut UserAccount,
    amount: u128,
    also_deposit: bool,
    now: u32,
) -> Result<u128, GvTokenError> {
    if amount == 0 {
        return Err(GvTokenError::ZeroAmount);
    }
    if also_deposit {
        user.push_deposit(amount, now)?;
        core.note_deposit(amount)?;
        msg!("Reward claimed and re-deposited");
    } else {
        msg!("Reward claimed");
    }
    Ok(amount)
}
