//! Program error codes
//!
//! Every failure is a synchronous rejection of the triggering instruction:
//! checks run before any state mutation, so a returned error implies no
//! side effects.

use pinocchio::program_error::ProgramError;

/// Errors surfaced by the gvtoken program
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GvTokenError {
    /// Instruction data is missing, truncated, or has an unknown
    /// discriminator
    InvalidInstruction = 0,
    /// Account owner, size, writability, or address does not match
    /// expectations
    InvalidAccount = 1,
    /// A required signer is missing
    MissingSignature = 2,
    /// Caller lacks authority over the target account or operation
    Unauthorized = 3,
    /// Zero-amount deposit or zero-amount pot/stake operation
    ZeroAmount = 4,
    /// Withdrawal amount exceeds the user's deposit total
    InsufficientDeposits = 5,
    /// Pot withdrawal exceeds the user's diverted amount
    InsufficientBribed = 6,
    /// Diverting more voting power than the user's balance supports
    InsufficientBalance = 7,
    /// Unstaking more than is currently staked to that vault
    InsufficientStake = 8,
    /// Staking would bring the per-user aggregate to or past 100%
    StakeCapExceeded = 9,
    /// Vault is not registered or has been deactivated
    InactiveVault = 10,
    /// No more room in a fixed-capacity table (deposit ledger, stake
    /// table, vault registry)
    CapacityExhausted = 11,
    /// Finalize called before the withdrawal delay elapsed
    WithdrawalNotReady = 12,
    /// No outstanding withdrawal request to finalize
    NoPendingWithdrawal = 13,
    /// Signed-delegation deadline has passed
    DeadlineExpired = 14,
    /// Signed-delegation nonce does not match the user's counter
    NonceMismatch = 15,
    /// Deposit start timestamp lies in the future
    StartInFuture = 16,
    /// Total-supply adjustment outside the permitted band or not strictly
    /// increasing
    SupplyOutOfRange = 17,
    /// Withdrawal delay below the two-week minimum
    DelayTooShort = 18,
    /// Arithmetic overflow in a conversion
    MathOverflow = 19,
    /// Deposit start would break the ledger's chronological order
    StartOutOfOrder = 20,
}

impl From<GvTokenError> for ProgramError {
    fn from(e: GvTokenError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
