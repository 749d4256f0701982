//! Governance-only setters
//!
//! Authorization is a single capability check against the governance
//! key in the global state; the entrypoint verifies the signer before
//! any of these run.

use crate::state::CoreState;
use growvote_common::GvTokenError;
use pinocchio::{msg, pubkey::Pubkey};
use pinocchio_log::log;

/// Set the withdrawal delay (whole weeks, two-week minimum).
pub fn process_set_withdrawal_delay(
    core: &mut CoreState,
    delay: u32,
) -> Result<(), GvTokenError> {
    core.set_withdrawal_delay(delay)?;
    log!("withdrawal delay set: {}s", core.withdrawal_delay);
    Ok(())
}

/// Set the legacy-proof merkle root.
pub fn process_set_proof_root(
    core: &mut CoreState,
    root: [u8; 32],
) -> Result<(), GvTokenError> {
    core.set_proof_root(root);
    msg!("Proof root updated");
    Ok(())
}

/// Raise the total voting-power supply within the permitted band.
pub fn process_adjust_total_supply(
    core: &mut CoreState,
    new_supply: u128,
) -> Result<(), GvTokenError> {
    core.adjust_total_supply(new_supply)?;
    msg!("Total supply adjusted");
    Ok(())
}

/// Register (or reactivate) a risk vault.
pub fn process_register_vault(
    core: &mut CoreState,
    vault: Pubkey,
) -> Result<(), GvTokenError> {
    core.register_vault(vault)?;
    msg!("Vault registered");
    Ok(())
}

/// Deactivate a risk vault; existing allocations can still unwind.
pub fn process_deactivate_vault(
    core: &mut CoreState,
    vault: &Pubkey,
) -> Result<(), GvTokenError> {
    core.deactivate_vault(vault)?;
    msg!("Vault deactivated");
    Ok(())
}
