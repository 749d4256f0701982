//! Protocol-wide constants

/// Seconds per week
pub const WEEK: u32 = 7 * 24 * 60 * 60;

/// Maturation window: a deposit's voting power grows linearly for 52 weeks,
/// after which it equals the deposited amount and stops growing
pub const MAX_GROW: u32 = 52 * WEEK;

/// Fixed-point scale (1e18) for the deposit-balance to voting-power
/// conversion rate
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Staking percentages are expressed in hundred-thousandths
/// (100_000 = 100%)
pub const PERCENT_DENOM: u32 = 100_000;

/// Governance cannot set a withdrawal delay below two weeks
pub const MIN_WITHDRAWAL_DELAY: u32 = 2 * WEEK;

/// Maximum live deposit entries per user ledger
pub const MAX_DEPOSITS: usize = 64;

/// Maximum vaults a single user can hold stake allocations in
pub const MAX_STAKE_VAULTS: usize = 16;

/// Maximum vaults in the active-vault registry
pub const MAX_VAULTS: usize = 32;
