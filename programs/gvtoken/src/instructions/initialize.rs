//! Initialize instructions for the global state and user ledgers

use crate::pda::{derive_core_pda, derive_user_pda};
use crate::state::{CoreState, UserAccount};
use growvote_common::*;
use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey};

/// Initialize the global state account.
///
/// Called once at deployment; the account must be the ["core"] PDA,
/// sized exactly, and not yet initialized.
pub fn process_initialize(
    program_id: &Pubkey,
    core_account: &AccountInfo,
    governance: &Pubkey,
    pot_authority: &Pubkey,
    proof_authority: &Pubkey,
) -> Result<(), GvTokenError> {
    let (expected_pda, bump) = derive_core_pda(program_id);
    if core_account.key() != &expected_pda {
        msg!("Error: core account is not the correct PDA");
        return Err(GvTokenError::InvalidAccount);
    }

    let data = core_account
        .try_borrow_data()
        .map_err(|_| GvTokenError::InvalidAccount)?;
    if data.len() != CoreState::LEN {
        msg!("Error: core account has incorrect size");
        return Err(GvTokenError::InvalidAccount);
    }
    if data[0] != 0 {
        msg!("Error: core account already initialized");
        return Err(GvTokenError::InvalidAccount);
    }
    drop(data);

    let core = unsafe { borrow_account_data_mut::<CoreState>(core_account)? };
    core.initialize_in_place(*governance, *pot_authority, *proof_authority, bump);

    msg!("Core state initialized");
    Ok(())
}

/// Initialize a user ledger account for `owner`.
pub fn process_initialize_user(
    program_id: &Pubkey,
    user_account: &AccountInfo,
    owner: &Pubkey,
) -> Result<(), GvTokenError> {
    let (expected_pda, bump) = derive_user_pda(owner, program_id);
    if user_account.key() != &expected_pda {
        msg!("Error: user account is not the correct PDA");
        return Err(GvTokenError::InvalidAccount);
    }

    let data = user_account
        .try_borrow_data()
        .map_err(|_| GvTokenError::InvalidAccount)?;
    if data.len() != UserAccount::LEN {
        msg!("Error: user account has incorrect size");
        return Err(GvTokenError::InvalidAccount);
    }
    if data[0] != 0 {
        msg!("Error: user account already initialized");
        return Err(GvTokenError::InvalidAccount);
    }
    drop(data);

    let user = unsafe { borrow_account_data_mut::<UserAccount>(user_account)? };
    user.initialize_in_place(*owner, bump);

    msg!("User ledger initialized");
    Ok(())
}
