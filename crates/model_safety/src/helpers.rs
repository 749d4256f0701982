//! Invariant checking helpers

use crate::growth::*;
use crate::math::*;
use crate::state::*;

/// Global conservation: total_deposited equals the sum over all users
/// of the sum of their live deposit amounts
pub fn conservation_ok(s: &State) -> bool {
    let sum = s.users.iter().fold(0u128, |acc, u| {
        u.deposits
            .iter()
            .fold(acc, |inner, d| add_amt(inner, d.amount))
    });
    s.total_deposited == sum
}

/// Per-user redundant totals never diverge from the ledger itself
pub fn user_totals_ok(s: &State) -> bool {
    s.users.iter().all(|u| {
        let sum = u
            .deposits
            .iter()
            .fold(0u128, |acc, d| add_amt(acc, d.amount));
        u.deposit_total == sum
    })
}

/// Pot accounting: the global diverted total equals the per-user sum
pub fn diverted_ok(s: &State) -> bool {
    let sum = s.users.iter().fold(0u128, |acc, u| add_amt(acc, u.bribed));
    s.total_diverted == sum
}

/// Stake aggregates stay strictly below 100% and match the per-vault
/// allocations
pub fn stake_cap_ok(s: &State) -> bool {
    s.users.iter().all(|u| {
        let sum: u32 = u.stakes.iter().map(|(_, p)| p).sum();
        u.total_staked_percent < PERCENT_DENOM && u.total_staked_percent == sum
    })
}

/// Each ledger stays in chronological order (non-decreasing starts)
pub fn ledgers_ordered_ok(s: &State) -> bool {
    s.users.iter().all(|u| {
        u.deposits
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start)
    })
}

/// No user has more delegated votes than their balance supports at `now`
pub fn delegation_bounded_ok(s: &State, now: u32) -> bool {
    s.users.iter().all(|u| u.delegated <= balance(u, now))
}

/// Voting power never regresses between two observation times
pub fn balances_monotone(s: &State, t1: u32, t2: u32) -> bool {
    if t1 > t2 {
        return true;
    }
    s.users.iter().all(|u| balance(u, t1) <= balance(u, t2))
}
