//! User ledger account decoding
//!
//! The keeper only needs a few fixed-offset fields out of the on-chain
//! `UserAccount` layout: the owner, the pending withdrawal amount, and
//! the time the request matures.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Byte size of an on-chain user ledger account
pub const USER_ACCOUNT_LEN: usize = 2848;

const OWNER_OFFSET: usize = 0;
const PENDING_WITHDRAWAL_OFFSET: usize = 80;
const WITHDRAWAL_END_OFFSET: usize = 104;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("account data too short: {0} bytes")]
    TooShort(usize),
}

/// Withdrawal request snapshot scraped from one user account
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// User ledger account address
    pub account: Pubkey,
    /// Recorded owner
    pub owner: Pubkey,
    /// Outstanding base-asset amount
    pub amount: u128,
    /// Time the request can finalize
    pub end_time: u32,
}

/// Decode the withdrawal request out of raw account data; `None` when
/// the user has no outstanding request.
pub fn decode_pending_request(
    account: Pubkey,
    data: &[u8],
) -> Result<Option<PendingRequest>, ScanError> {
    if data.len() < USER_ACCOUNT_LEN {
        return Err(ScanError::TooShort(data.len()));
    }

    let mut amount_bytes = [0u8; 16];
    amount_bytes.copy_from_slice(
        &data[PENDING_WITHDRAWAL_OFFSET..PENDING_WITHDRAWAL_OFFSET + 16],
    );
    let amount = u128::from_le_bytes(amount_bytes);
    if amount == 0 {
        return Ok(None);
    }

    let mut owner_bytes = [0u8; 32];
    owner_bytes.copy_from_slice(&data[OWNER_OFFSET..OWNER_OFFSET + 32]);

    let mut end_bytes = [0u8; 4];
    end_bytes.copy_from_slice(&data[WITHDRAWAL_END_OFFSET..WITHDRAWAL_END_OFFSET + 4]);

    Ok(Some(PendingRequest {
        account,
        owner: Pubkey::new_from_array(owner_bytes),
        amount,
        end_time: u32::from_le_bytes(end_bytes),
    }))
}
