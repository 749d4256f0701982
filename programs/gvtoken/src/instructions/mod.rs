/// Instruction handlers

pub mod delegate;
pub mod deposit;
pub mod governance;
pub mod initialize;
pub mod pot;
pub mod stake;
pub mod withdraw;

pub use delegate::*;
pub use deposit::*;
pub use governance::*;
pub use initialize::*;
pub use pot::*;
pub use stake::*;
pub use withdraw::*;

/// Instruction discriminator (first byte of instruction data)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GvInstruction {
    /// Initialize the global state
    Initialize = 0,
    /// Initialize a user ledger account
    InitializeUser = 1,
    /// Deposit base asset; growth starts now
    Deposit = 2,
    /// Deposit with a proof-gated earlier start timestamp
    DepositWithStart = 3,
    /// Request a (possibly accumulated) withdrawal
    RequestWithdrawal = 4,
    /// Finalize the outstanding withdrawal after the delay
    FinalizeWithdrawal = 5,
    /// Allocate a percentage of voting power to a vault
    Stake = 6,
    /// Remove a percentage allocation from a vault
    Unstake = 7,
    /// Divert voting power to the rewards pot
    DepositToPot = 8,
    /// Pull diverted voting power back from the pot
    WithdrawFromPot = 9,
    /// Claim pot rewards, optionally re-depositing them
    ClaimReward = 10,
    /// Delegate votes (nonce- and deadline-checked)
    Delegate = 11,
    /// Governance: set the withdrawal delay
    SetWithdrawalDelay = 12,
    /// Governance: set the legacy-proof root
    SetProofRoot = 13,
    /// Governance: bounded total-supply increase
    AdjustTotalSupply = 14,
    /// Governance: register an active vault
    RegisterVault = 15,
    /// Governance: deactivate a vault
    DeactivateVault = 16,
}

impl GvInstruction {
    pub fn from_discriminator(d: u8) -> Option<Self> {
        match d {
            0 => Some(Self::Initialize),
            1 => Some(Self::InitializeUser),
            2 => Some(Self::Deposit),
            3 => Some(Self::DepositWithStart),
            4 => Some(Self::RequestWithdrawal),
            5 => Some(Self::FinalizeWithdrawal),
            6 => Some(Self::Stake),
            7 => Some(Self::Unstake),
            8 => Some(Self::DepositToPot),
            9 => Some(Self::WithdrawFromPot),
            10 => Some(Self::ClaimReward),
            11 => Some(Self::Delegate),
            12 => Some(Self::SetWithdrawalDelay),
            13 => Some(Self::SetProofRoot),
            14 => Some(Self::AdjustTotalSupply),
            15 => Some(Self::RegisterVault),
            16 => Some(Self::DeactivateVault),
            _ => None,
        }
    }
}
