//! Account validation and typed access helpers

use crate::error::GvTokenError;
use pinocchio::{account_info::AccountInfo, pubkey::Pubkey};

/// Require the account to be owned by `program_id`
pub fn validate_owner(
    account: &AccountInfo,
    program_id: &Pubkey,
) -> Result<(), GvTokenError> {
    if !account.is_owned_by(program_id) {
        return Err(GvTokenError::InvalidAccount);
    }
    Ok(())
}

/// Require the account to be writable
pub fn validate_writable(account: &AccountInfo) -> Result<(), GvTokenError> {
    if !account.is_writable() {
        return Err(GvTokenError::InvalidAccount);
    }
    Ok(())
}

/// Require the account to have signed the transaction
pub fn validate_signer(account: &AccountInfo) -> Result<(), GvTokenError> {
    if !account.is_signer() {
        return Err(GvTokenError::MissingSignature);
    }
    Ok(())
}

/// Borrow account data as a typed reference.
///
/// # Safety
///
/// `T` must be `#[repr(C)]` and the account must actually hold a `T`; the
/// caller is responsible for having validated owner and size. No other
/// borrow of this account's data may be live.
pub unsafe fn borrow_account_data<T>(
    account: &AccountInfo,
) -> Result<&T, GvTokenError> {
    let data = account.borrow_data_unchecked();
    if data.len() < core::mem::size_of::<T>() {
        return Err(GvTokenError::InvalidAccount);
    }
    Ok(&*(data.as_ptr() as *const T))
}

/// Borrow account data as a mutable typed reference.
///
/// # Safety
///
/// Same requirements as [`borrow_account_data`], and the account must be
/// writable.
pub unsafe fn borrow_account_data_mut<T>(
    account: &AccountInfo,
) -> Result<&mut T, GvTokenError> {
    let data = account.borrow_mut_data_unchecked();
    if data.len() < core::mem::size_of::<T>() {
        return Err(GvTokenError::InvalidAccount);
    }
    Ok(&mut *(data.as_mut_ptr() as *mut T))
}
