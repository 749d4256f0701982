//! Vault staking instructions
//!
//! Users allocate percentages of their unencumbered voting power as
//! backing for registered risk vaults. Allocations are pure bookkeeping
//! here; the vaults read them externally.

use crate::state::{CoreState, UserAccount};
use growvote_common::GvTokenError;
use pinocchio::pubkey::Pubkey;
use pinocchio_log::log;

/// Stake `percent` (hundred-thousandths) to `vault`.
pub fn process_stake(
    core: &CoreState,
    user: &mut UserAccount,
    vault: Pubkey,
    percent: u32,
) -> Result<(), GvTokenError> {
    if !core.is_active_vault(&vault) {
        return Err(GvTokenError::InactiveVault);
    }
    user.stake(vault, percent)?;
    log!("stake: {} / 100000", percent);
    Ok(())
}

/// Unstake `percent` from `vault`.
pub fn process_unstake(
    user: &mut UserAccount,
    vault: &Pubkey,
    percent: u32,
) -> Result<(), GvTokenError> {
    user.unstake(vault, percent)?;
    log!("unstake: {} / 100000", percent);
    Ok(())
}
