//! Pure state model for Kani verification

use arrayvec::ArrayVec;

/// Small fixed bounds keep Kani unwinding tractable
pub const MAX_LEDGER: usize = 6;
pub const MAX_STAKES: usize = 4;
pub const MAX_USERS: usize = 4;
pub const MAX_VAULT_IDS: usize = 4;

/// One timestamped deposit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deposit {
    pub amount: u128,
    pub start: u32,
}

/// Per-user ledger state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// Deposit ledger, oldest first
    pub deposits: ArrayVec<Deposit, MAX_LEDGER>,
    /// Redundant sum of live deposit amounts
    pub deposit_total: u128,
    /// Voting power diverted to the rewards pot
    pub bribed: u128,
    /// Voting power delegated away
    pub delegated: u128,
    /// Outstanding withdrawal request amount
    pub pending_withdrawal: u128,
    /// Earliest finalize time for the outstanding request
    pub withdrawal_end: u32,
    /// Aggregate stake percentage, strictly below 100%
    pub total_staked_percent: u32,
    /// Per-vault allocations: (vault id, percent)
    pub stakes: ArrayVec<(usize, u32), MAX_STAKES>,
    /// Delegation nonce
    pub nonce: u64,
}

/// Governance parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub withdrawal_delay: u32,
}

/// Whole-system state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub users: ArrayVec<User, MAX_USERS>,
    /// Sum of all live deposit amounts across all users
    pub total_deposited: u128,
    /// Derived voting-power total
    pub total_supply: u128,
    /// Voting power diverted to the pot, all users
    pub total_diverted: u128,
    pub params: Params,
    /// Active flags per vault id
    pub active_vaults: [bool; MAX_VAULT_IDS],
}

impl Default for User {
    fn default() -> Self {
        Self {
            deposits: ArrayVec::new(),
            deposit_total: 0,
            bribed: 0,
            delegated: 0,
            pending_withdrawal: 0,
            withdrawal_end: 0,
            total_staked_percent: 0,
            stakes: ArrayVec::new(),
            nonce: 0,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            withdrawal_delay: crate::growth::MIN_WITHDRAWAL_DELAY,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            users: ArrayVec::new(),
            total_deposited: 0,
            total_supply: 0,
            total_diverted: 0,
            params: Params::default(),
            active_vaults: [true; MAX_VAULT_IDS],
        }
    }
}
