//! Per-user ledger account
//!
//! Holds the chronologically ordered deposit ledger, the single
//! outstanding withdrawal request, per-vault stake allocations, and the
//! amounts diverted to the rewards pot and delegated away. The ledger is
//! append-at-tail / pop-from-tail: withdrawing removes the most recently
//! deposited (least matured) funds first, and a partially consumed entry
//! keeps its original start timestamp so the retained slice keeps its
//! accrued growth.

use crate::math::{earned, percent_to_absolute};
use growvote_common::{
    checked_add, checked_sub, GvTokenError, MAX_DEPOSITS, MAX_GROW,
    MAX_STAKE_VAULTS, PERCENT_DENOM,
};
use pinocchio::pubkey::Pubkey;

/// One timestamped deposit
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    /// Base-asset amount
    pub amount: u128,
    /// UNIX timestamp the growth clock started
    pub start: u32,
    /// Padding
    pub _padding: [u8; 12],
}

impl Deposit {
    pub fn new(amount: u128, start: u32) -> Self {
        Self {
            amount,
            start,
            _padding: [0; 12],
        }
    }
}

/// Per-vault stake allocation, in hundred-thousandths of the user's
/// unencumbered balance
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StakeEntry {
    /// Risk-vault address
    pub vault: Pubkey,
    /// Allocated percentage (0..PERCENT_DENOM)
    pub percent: u32,
    /// Padding
    pub _padding: [u8; 4],
}

/// User ledger account
/// PDA: ["user", owner]
#[repr(C)]
pub struct UserAccount {
    /// Account owner
    pub owner: Pubkey,
    /// Redundant sum of all live deposit amounts; must always equal the
    /// ledger's own sum
    pub deposit_total: u128,
    /// Voting power diverted to the rewards pot
    pub bribed: u128,
    /// Voting power delegated away, mirrored from the external tracker
    pub delegated: u128,
    /// Outstanding withdrawal request amount (base asset)
    pub pending_withdrawal: u128,
    /// Nonce for signed delegation; strictly increasing
    pub nonce: u64,
    /// Earliest time the outstanding request can finalize
    pub withdrawal_end: u32,
    /// Sum of stake percentages across all vaults; strictly below 100%
    pub total_staked_percent: u32,
    /// Live entries in `deposits`
    pub deposit_count: u16,
    /// Live entries in `stakes`
    pub stake_count: u16,
    /// Current delegatee (zeroed when none)
    pub delegatee: Pubkey,
    /// Bump seed
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 11],
    /// Deposit ledger, oldest first
    pub deposits: [Deposit; MAX_DEPOSITS],
    /// Stake allocations
    pub stakes: [StakeEntry; MAX_STAKE_VAULTS],
}

impl UserAccount {
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Initialize in-place (avoids a large stack temporary on BPF)
    pub fn initialize_in_place(&mut self, owner: Pubkey, bump: u8) {
        self.owner = owner;
        self.deposit_total = 0;
        self.bribed = 0;
        self.delegated = 0;
        self.pending_withdrawal = 0;
        self.nonce = 0;
        self.withdrawal_end = 0;
        self.total_staked_percent = 0;
        self.deposit_count = 0;
        self.stake_count = 0;
        self.delegatee = Pubkey::default();
        self.bump = bump;
        self._padding = [0; 11];
        unsafe {
            core::ptr::write_bytes(self.deposits.as_mut_ptr(), 0, MAX_DEPOSITS);
            core::ptr::write_bytes(self.stakes.as_mut_ptr(), 0, MAX_STAKE_VAULTS);
        }
    }

    /// Stack-constructed account (tests only)
    #[cfg(all(test, not(target_os = "solana")))]
    pub fn new(owner: Pubkey, bump: u8) -> Self {
        Self {
            owner,
            deposit_total: 0,
            bribed: 0,
            delegated: 0,
            pending_withdrawal: 0,
            nonce: 0,
            withdrawal_end: 0,
            total_staked_percent: 0,
            deposit_count: 0,
            stake_count: 0,
            delegatee: Pubkey::default(),
            bump,
            _padding: [0; 11],
            deposits: [Deposit::new(0, 0); MAX_DEPOSITS],
            stakes: [StakeEntry {
                vault: Pubkey::default(),
                percent: 0,
                _padding: [0; 4],
            }; MAX_STAKE_VAULTS],
        }
    }

    // ------------------------------------------------------------------
    // Deposit ledger
    // ------------------------------------------------------------------

    /// Live deposit entries, oldest first
    pub fn ledger(&self) -> &[Deposit] {
        &self.deposits[..self.deposit_count as usize]
    }

    /// Append a deposit at the tail of the ledger.
    ///
    /// The ledger must stay chronologically ordered: the maturity
    /// short-circuit in [`Self::earned_power`] depends on it. A start
    /// before the current tail is rejected, which in practice only
    /// constrains proof-gated legacy deposits made after regular ones.
    pub fn push_deposit(&mut self, amount: u128, start: u32) -> Result<(), GvTokenError> {
        if amount == 0 {
            return Err(GvTokenError::ZeroAmount);
        }
        if (self.deposit_count as usize) >= MAX_DEPOSITS {
            return Err(GvTokenError::CapacityExhausted);
        }
        if let Some(last) = self.ledger().last() {
            if start < last.start {
                return Err(GvTokenError::StartOutOfOrder);
            }
        }
        self.deposit_total = checked_add(self.deposit_total, amount)?;
        self.deposits[self.deposit_count as usize] = Deposit::new(amount, start);
        self.deposit_count += 1;
        Ok(())
    }

    /// Deposit balance and accrued voting power at `now`.
    ///
    /// Scans from the newest entry backward. The first entry found to be
    /// fully matured ends the scan: entries are stored oldest first, so
    /// everything at or before it is at least as old, and its combined
    /// principal (`deposit_total` minus the still-growing principal
    /// already scanned) is added as matured power in one step. Stopping
    /// early without that backfill would under-count matured power.
    pub fn earned_power(&self, now: u32) -> Result<(u128, u128), GvTokenError> {
        let mut accrued: u128 = 0;
        let mut growing: u128 = 0;
        let mut hit_matured = false;

        for dep in self.ledger().iter().rev() {
            let age = now.saturating_sub(dep.start);
            if age >= MAX_GROW {
                hit_matured = true;
                break;
            }
            accrued = checked_add(accrued, earned(dep.amount, age)?)?;
            growing = checked_add(growing, dep.amount)?;
        }
        if hit_matured {
            let matured = checked_sub(self.deposit_total, growing)?;
            accrued = checked_add(accrued, matured)?;
        }
        Ok((self.deposit_total, accrued))
    }

    /// Total voting power at `now`: principal plus accrued growth
    pub fn balance(&self, now: u32) -> Result<u128, GvTokenError> {
        let (deposit_balance, accrued) = self.earned_power(now)?;
        checked_add(deposit_balance, accrued)
    }

    /// Remove `amount` of principal from the newest end of the ledger.
    ///
    /// Entries are consumed most-recent first; a partially consumed entry
    /// is replaced by a remainder carrying its original start timestamp.
    pub fn pop_for_withdrawal(&mut self, amount: u128) -> Result<(), GvTokenError> {
        if amount > self.deposit_total {
            return Err(GvTokenError::InsufficientDeposits);
        }
        let mut remaining = amount;
        while remaining > 0 {
            let idx = self.deposit_count as usize - 1;
            let entry = self.deposits[idx];
            if entry.amount > remaining {
                // Remainder keeps the entry's start; its accrued growth
                // is retained
                self.deposits[idx] = Deposit::new(entry.amount - remaining, entry.start);
                remaining = 0;
            } else {
                remaining -= entry.amount;
                self.deposits[idx] = Deposit::new(0, 0);
                self.deposit_count -= 1;
            }
        }
        self.deposit_total -= amount;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Withdrawal request
    // ------------------------------------------------------------------

    /// Fold `amount` into the single outstanding request and restart the
    /// delay clock for the combined amount
    pub fn accumulate_withdrawal(
        &mut self,
        amount: u128,
        now: u32,
        delay: u32,
    ) -> Result<(), GvTokenError> {
        self.pending_withdrawal = checked_add(self.pending_withdrawal, amount)?;
        self.withdrawal_end = now
            .checked_add(delay)
            .ok_or(GvTokenError::MathOverflow)?;
        Ok(())
    }

    /// Clear the outstanding request once its delay has elapsed,
    /// returning the base-asset amount to pay out
    pub fn take_finalized(&mut self, now: u32) -> Result<u128, GvTokenError> {
        if self.pending_withdrawal == 0 {
            return Err(GvTokenError::NoPendingWithdrawal);
        }
        if now < self.withdrawal_end {
            return Err(GvTokenError::WithdrawalNotReady);
        }
        let amount = self.pending_withdrawal;
        self.pending_withdrawal = 0;
        self.withdrawal_end = 0;
        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Vault staking
    // ------------------------------------------------------------------

    /// Percentage currently staked to `vault`
    pub fn staked_percent(&self, vault: &Pubkey) -> u32 {
        self.find_stake(vault)
            .map(|idx| self.stakes[idx].percent)
            .unwrap_or(0)
    }

    fn find_stake(&self, vault: &Pubkey) -> Option<usize> {
        (0..self.stake_count as usize).find(|&i| &self.stakes[i].vault == vault)
    }

    /// Add `percent` to the allocation for `vault`.
    ///
    /// The per-user aggregate must stay strictly below 100%.
    pub fn stake(&mut self, vault: Pubkey, percent: u32) -> Result<(), GvTokenError> {
        if percent == 0 {
            return Err(GvTokenError::ZeroAmount);
        }
        let new_total = self
            .total_staked_percent
            .checked_add(percent)
            .ok_or(GvTokenError::StakeCapExceeded)?;
        if new_total >= PERCENT_DENOM {
            return Err(GvTokenError::StakeCapExceeded);
        }
        match self.find_stake(&vault) {
            Some(idx) => self.stakes[idx].percent += percent,
            None => {
                if (self.stake_count as usize) >= MAX_STAKE_VAULTS {
                    return Err(GvTokenError::CapacityExhausted);
                }
                let idx = self.stake_count as usize;
                self.stakes[idx] = StakeEntry {
                    vault,
                    percent,
                    _padding: [0; 4],
                };
                self.stake_count += 1;
            }
        }
        self.total_staked_percent = new_total;
        Ok(())
    }

    /// Remove `percent` from the allocation for `vault`
    pub fn unstake(&mut self, vault: &Pubkey, percent: u32) -> Result<(), GvTokenError> {
        let idx = self
            .find_stake(vault)
            .ok_or(GvTokenError::InsufficientStake)?;
        let current = self.stakes[idx].percent;
        if percent > current {
            return Err(GvTokenError::InsufficientStake);
        }
        self.stakes[idx].percent = current - percent;
        self.total_staked_percent -= percent;
        if self.stakes[idx].percent == 0 {
            // Swap with the last live entry and shrink
            let last = self.stake_count as usize - 1;
            if idx != last {
                self.stakes[idx] = self.stakes[last];
            }
            self.stakes[last] = StakeEntry {
                vault: Pubkey::default(),
                percent: 0,
                _padding: [0; 4],
            };
            self.stake_count -= 1;
        }
        Ok(())
    }

    /// Sum of absolute voting power backing vault allocations at `now`
    pub fn staked_absolute(&self, now: u32) -> Result<u128, GvTokenError> {
        let balance = self.balance(now)?;
        percent_to_absolute(self.total_staked_percent, balance, self.bribed)
    }

    /// Unencumbered voting power still available to allocate:
    /// balance minus staked-absolute minus bribed
    pub fn available_for_stake(&self, now: u32) -> Result<u128, GvTokenError> {
        let balance = self.balance(now)?;
        let staked = percent_to_absolute(self.total_staked_percent, balance, self.bribed)?;
        let encumbered = checked_add(staked, self.bribed)?;
        checked_sub(balance, encumbered)
    }

    // ------------------------------------------------------------------
    // Rewards pot
    // ------------------------------------------------------------------

    /// Divert `amount` of voting power to the pot; requires the user's
    /// balance to cover all diverted power at call time
    pub fn divert_to_pot(&mut self, amount: u128, balance: u128) -> Result<(), GvTokenError> {
        if amount == 0 {
            return Err(GvTokenError::ZeroAmount);
        }
        let diverted = checked_add(self.bribed, amount)?;
        if diverted > balance {
            return Err(GvTokenError::InsufficientBalance);
        }
        self.bribed = diverted;
        Ok(())
    }

    /// Return `amount` of voting power from the pot
    pub fn return_from_pot(&mut self, amount: u128) -> Result<(), GvTokenError> {
        if amount == 0 {
            return Err(GvTokenError::ZeroAmount);
        }
        self.bribed = self
            .bribed
            .checked_sub(amount)
            .ok_or(GvTokenError::InsufficientBribed)?;
        Ok(())
    }

    /// Pot collateral that must be released before withdrawing
    /// `gv_amount` out of a total balance of `balance`: the part of the
    /// withdrawal not covered by unencumbered power, capped at what is
    /// actually diverted
    pub fn collateral_shortfall(&self, gv_amount: u128, balance: u128) -> u128 {
        let unencumbered = balance.saturating_sub(self.bribed);
        let shortfall = gv_amount.saturating_sub(unencumbered);
        if shortfall > self.bribed {
            self.bribed
        } else {
            shortfall
        }
    }

    // ------------------------------------------------------------------
    // Delegation
    // ------------------------------------------------------------------

    /// Trim the delegated snapshot to the post-withdrawal balance,
    /// returning the excess that the external tracker must move back to
    /// the zero delegate
    pub fn reconcile_delegation(&mut self, balance_after: u128) -> u128 {
        if self.delegated > balance_after {
            let excess = self.delegated - balance_after;
            self.delegated = balance_after;
            excess
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growvote_common::WEEK;

    const T0: u32 = 1_700_000_000;

    fn fresh() -> UserAccount {
        UserAccount::new(Pubkey::from([7; 32]), 0)
    }

    #[test]
    fn test_push_deposit_rejects_zero() {
        let mut user = fresh();
        assert_eq!(user.push_deposit(0, T0), Err(GvTokenError::ZeroAmount));
        assert_eq!(user.deposit_count, 0);
    }

    #[test]
    fn test_push_deposit_updates_totals() {
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        user.push_deposit(50, T0 + 1).unwrap();
        assert_eq!(user.deposit_total, 150);
        assert_eq!(user.ledger().len(), 2);
        assert_eq!(user.ledger()[0].amount, 100);
        assert_eq!(user.ledger()[1].start, T0 + 1);
    }

    #[test]
    fn test_push_deposit_keeps_chronological_order() {
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        assert_eq!(
            user.push_deposit(50, T0 - 1),
            Err(GvTokenError::StartOutOfOrder)
        );
        // Equal start is fine (same-block deposits)
        user.push_deposit(50, T0).unwrap();
    }

    #[test]
    fn test_ledger_capacity() {
        let mut user = fresh();
        for i in 0..MAX_DEPOSITS {
            user.push_deposit(1, T0 + i as u32).unwrap();
        }
        assert_eq!(
            user.push_deposit(1, T0),
            Err(GvTokenError::CapacityExhausted)
        );
    }

    #[test]
    fn test_balance_growth_scenario() {
        // 100 at t0 reads 150 at half maturity, 200 at the cap, and 200
        // forever after
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();

        assert_eq!(user.balance(T0).unwrap(), 100);
        assert_eq!(user.balance(T0 + MAX_GROW / 2).unwrap(), 150);
        assert_eq!(user.balance(T0 + MAX_GROW).unwrap(), 200);
        assert_eq!(user.balance(T0 + MAX_GROW * 3).unwrap(), 200);
    }

    #[test]
    fn test_earned_power_matured_backfill() {
        // Old matured entries are counted through the backfill step, not
        // by rescanning
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        user.push_deposit(100, T0 + WEEK).unwrap();
        user.push_deposit(100, T0 + MAX_GROW + WEEK).unwrap();

        let now = T0 + MAX_GROW + WEEK + MAX_GROW / 2;
        let (deposit_balance, accrued) = user.earned_power(now).unwrap();
        assert_eq!(deposit_balance, 300);
        // First two entries fully matured (200), newest half grown (50)
        assert_eq!(accrued, 250);
    }

    #[test]
    fn test_earned_power_all_matured() {
        let mut user = fresh();
        user.push_deposit(40, T0).unwrap();
        user.push_deposit(60, T0 + 1).unwrap();
        let (db, accrued) = user.earned_power(T0 + MAX_GROW * 2).unwrap();
        assert_eq!(db, 100);
        assert_eq!(accrued, 100);
    }

    #[test]
    fn test_pop_lifo_remainder_keeps_start() {
        // Withdraw less than the newest deposit: its remainder keeps its
        // own timestamp and the older entry is untouched
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        user.push_deposit(80, T0 + WEEK).unwrap();

        user.pop_for_withdrawal(30).unwrap();
        assert_eq!(user.deposit_total, 150);
        assert_eq!(user.ledger().len(), 2);
        assert_eq!(user.ledger()[1].amount, 50);
        assert_eq!(user.ledger()[1].start, T0 + WEEK);
        assert_eq!(user.ledger()[0].amount, 100);
        assert_eq!(user.ledger()[0].start, T0);
    }

    #[test]
    fn test_pop_spans_entries() {
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        user.push_deposit(80, T0 + 1).unwrap();
        user.push_deposit(20, T0 + 2).unwrap();

        // Consumes the 20 and 80 entries and 10 of the oldest
        user.pop_for_withdrawal(110).unwrap();
        assert_eq!(user.deposit_total, 90);
        assert_eq!(user.ledger().len(), 1);
        assert_eq!(user.ledger()[0].amount, 90);
        assert_eq!(user.ledger()[0].start, T0);
    }

    #[test]
    fn test_pop_exact_and_overdraw() {
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        assert_eq!(
            user.pop_for_withdrawal(101),
            Err(GvTokenError::InsufficientDeposits)
        );
        user.pop_for_withdrawal(100).unwrap();
        assert_eq!(user.deposit_total, 0);
        assert_eq!(user.ledger().len(), 0);
    }

    #[test]
    fn test_withdrawal_request_accumulates() {
        let mut user = fresh();
        let delay = 2 * WEEK;

        user.accumulate_withdrawal(40, T0, delay).unwrap();
        assert_eq!(user.pending_withdrawal, 40);
        assert_eq!(user.withdrawal_end, T0 + delay);

        // Second request folds in and restarts the clock for the
        // combined amount
        user.accumulate_withdrawal(10, T0 + WEEK, delay).unwrap();
        assert_eq!(user.pending_withdrawal, 50);
        assert_eq!(user.withdrawal_end, T0 + WEEK + delay);
    }

    #[test]
    fn test_finalize_timing() {
        let mut user = fresh();
        let delay = 2 * WEEK;

        assert_eq!(
            user.take_finalized(T0),
            Err(GvTokenError::NoPendingWithdrawal)
        );

        user.accumulate_withdrawal(40, T0, delay).unwrap();
        assert_eq!(
            user.take_finalized(T0 + delay - 1),
            Err(GvTokenError::WithdrawalNotReady)
        );
        assert_eq!(user.take_finalized(T0 + delay).unwrap(), 40);
        assert_eq!(user.pending_withdrawal, 0);
        assert_eq!(
            user.take_finalized(T0 + delay),
            Err(GvTokenError::NoPendingWithdrawal)
        );
    }

    #[test]
    fn test_stake_cap_strictly_below_full() {
        let mut user = fresh();
        let v1 = Pubkey::from([1; 32]);
        let v2 = Pubkey::from([2; 32]);

        user.stake(v1, 60_000).unwrap();
        user.stake(v2, 39_000).unwrap();
        assert_eq!(user.total_staked_percent, 99_000);

        // Reaching exactly 100% is rejected, prior allocations untouched
        assert_eq!(user.stake(v2, 1_000), Err(GvTokenError::StakeCapExceeded));
        assert_eq!(user.total_staked_percent, 99_000);
        assert_eq!(user.staked_percent(&v2), 39_000);

        user.stake(v2, 999).unwrap();
        assert_eq!(user.total_staked_percent, 99_999);
    }

    #[test]
    fn test_unstake_bounds() {
        let mut user = fresh();
        let vault = Pubkey::from([1; 32]);

        user.stake(vault, 10_000).unwrap();
        assert_eq!(
            user.unstake(&vault, 10_001),
            Err(GvTokenError::InsufficientStake)
        );
        user.unstake(&vault, 10_000).unwrap();
        assert_eq!(user.stake_count, 0);
        assert_eq!(user.total_staked_percent, 0);
        assert_eq!(
            user.unstake(&vault, 1),
            Err(GvTokenError::InsufficientStake)
        );
    }

    #[test]
    fn test_available_for_stake() {
        let mut user = fresh();
        user.push_deposit(1000, T0).unwrap();
        user.bribed = 200;
        let vault = Pubkey::from([1; 32]);
        user.stake(vault, 25_000).unwrap();

        // balance 1000, staked 25% of 800 = 200, bribed 200
        assert_eq!(user.staked_absolute(T0).unwrap(), 200);
        assert_eq!(user.available_for_stake(T0).unwrap(), 600);
    }

    #[test]
    fn test_pot_bounds() {
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        let balance = user.balance(T0).unwrap();

        user.divert_to_pot(60, balance).unwrap();
        assert_eq!(
            user.divert_to_pot(41, balance),
            Err(GvTokenError::InsufficientBalance)
        );
        user.return_from_pot(10).unwrap();
        assert_eq!(user.bribed, 50);
        assert_eq!(
            user.return_from_pot(51),
            Err(GvTokenError::InsufficientBribed)
        );
    }

    #[test]
    fn test_collateral_shortfall() {
        let mut user = fresh();
        user.bribed = 70;

        // balance 100, unencumbered 30: withdrawing 50 needs 20 back
        assert_eq!(user.collateral_shortfall(50, 100), 20);
        // fully covered by unencumbered power
        assert_eq!(user.collateral_shortfall(30, 100), 0);
        // never more than what is diverted
        assert_eq!(user.collateral_shortfall(500, 100), 70);
    }

    #[test]
    fn test_reconcile_delegation_trims_excess() {
        let mut user = fresh();
        user.delegated = 80;

        assert_eq!(user.reconcile_delegation(100), 0);
        assert_eq!(user.delegated, 80);

        assert_eq!(user.reconcile_delegation(50), 30);
        assert_eq!(user.delegated, 50);
    }

    #[test]
    fn test_redeposit_does_not_restore_growth() {
        // Withdraw-then-redeposit resets the growth clock by design
        let mut user = fresh();
        user.push_deposit(100, T0).unwrap();
        let now = T0 + MAX_GROW;
        assert_eq!(user.balance(now).unwrap(), 200);

        user.pop_for_withdrawal(100).unwrap();
        user.push_deposit(100, now).unwrap();
        assert_eq!(user.balance(now).unwrap(), 100);
    }
}
