//! State transition functions - all total, no panics
//!
//! Invalid operations return the state unchanged; the program surfaces
//! them as errors. Each transition mirrors one instruction of the
//! on-chain ledger.

use crate::growth::*;
use crate::math::*;
use crate::state::*;

/// Deposit `amount` with growth starting at `now`
pub fn deposit(s: State, uid: usize, amount: u128, now: u32) -> State {
    deposit_with_start(s, uid, amount, now, now)
}

/// Deposit `amount` with an earlier, proof-verified start
pub fn deposit_with_start(
    mut s: State,
    uid: usize,
    amount: u128,
    start: u32,
    now: u32,
) -> State {
    if uid >= s.users.len() || amount == 0 || start > now {
        return s;
    }
    let user = &mut s.users[uid];
    if user.deposits.is_full() {
        return s;
    }
    // Ledger stays chronologically ordered; the maturity short-circuit
    // depends on it
    if user.deposits.last().is_some_and(|d| start < d.start) {
        return s;
    }
    user.deposits.push(Deposit { amount, start });
    user.deposit_total = add_amt(user.deposit_total, amount);
    s.total_deposited = add_amt(s.total_deposited, amount);
    s.total_supply = add_amt(s.total_supply, amount);
    s
}

/// Request a withdrawal: size the exit in voting power, release pot
/// collateral, pop the ledger LIFO, shrink the supply, trim delegation,
/// and fold into the single outstanding request
pub fn request_withdrawal(mut s: State, uid: usize, amount: u128, now: u32) -> State {
    if uid >= s.users.len() || amount == 0 {
        return s;
    }
    if amount > s.users[uid].deposit_total {
        return s;
    }

    let (deposit_balance, accrued) = earned_power(&s.users[uid], now);
    let bal = add_amt(deposit_balance, accrued);
    let gv_amount = gv_value(amount, deposit_balance, accrued);

    let user = &mut s.users[uid];

    // Release pot collateral not covered by unencumbered power
    let unencumbered = sub_amt(bal, user.bribed);
    let shortfall = min_amt(sub_amt(gv_amount, unencumbered), user.bribed);
    user.bribed = sub_amt(user.bribed, shortfall);
    s.total_diverted = sub_amt(s.total_diverted, shortfall);

    // LIFO pop with remainder keeping its original start
    let user = &mut s.users[uid];
    let mut remaining = amount;
    while remaining > 0 {
        let Some(entry) = user.deposits.pop() else {
            break;
        };
        if entry.amount > remaining {
            user.deposits.push(Deposit {
                amount: entry.amount - remaining,
                start: entry.start,
            });
            remaining = 0;
        } else {
            remaining -= entry.amount;
        }
    }
    user.deposit_total = sub_amt(user.deposit_total, amount);

    // Global aggregates: supply clamps at zero and zeroes outright when
    // nothing remains deposited
    s.total_deposited = sub_amt(s.total_deposited, amount);
    if s.total_deposited == 0 {
        s.total_supply = 0;
    } else {
        s.total_supply = sub_amt(s.total_supply, gv_amount);
    }

    // Delegated votes can never exceed the remaining balance
    let user = &mut s.users[uid];
    let balance_after = sub_amt(bal, gv_amount);
    if user.delegated > balance_after {
        user.delegated = balance_after;
    }

    user.pending_withdrawal = add_amt(user.pending_withdrawal, amount);
    user.withdrawal_end = now.saturating_add(s.params.withdrawal_delay);
    s
}

/// Finalize the outstanding request once its delay elapsed
pub fn finalize_withdrawal(mut s: State, uid: usize, now: u32) -> State {
    if uid >= s.users.len() {
        return s;
    }
    let user = &mut s.users[uid];
    if user.pending_withdrawal == 0 || now < user.withdrawal_end {
        return s;
    }
    user.pending_withdrawal = 0;
    user.withdrawal_end = 0;
    s
}

/// Allocate `percent` of the user's power to `vault`
pub fn stake(mut s: State, uid: usize, vault: usize, percent: u32) -> State {
    if uid >= s.users.len() || vault >= MAX_VAULT_IDS || percent == 0 {
        return s;
    }
    if !s.active_vaults[vault] {
        return s;
    }
    let user = &mut s.users[uid];
    let Some(new_total) = user.total_staked_percent.checked_add(percent) else {
        return s;
    };
    if new_total >= PERCENT_DENOM {
        return s;
    }
    if let Some(entry) = user.stakes.iter_mut().find(|(v, _)| *v == vault) {
        entry.1 += percent;
    } else {
        if user.stakes.is_full() {
            return s;
        }
        user.stakes.push((vault, percent));
    }
    user.total_staked_percent = new_total;
    s
}

/// Remove `percent` from the allocation for `vault`
pub fn unstake(mut s: State, uid: usize, vault: usize, percent: u32) -> State {
    if uid >= s.users.len() {
        return s;
    }
    let user = &mut s.users[uid];
    let Some(idx) = user.stakes.iter().position(|(v, _)| *v == vault) else {
        return s;
    };
    if percent > user.stakes[idx].1 {
        return s;
    }
    user.stakes[idx].1 -= percent;
    user.total_staked_percent -= percent;
    if user.stakes[idx].1 == 0 {
        user.stakes.swap_remove(idx);
    }
    s
}

/// Divert voting power to the rewards pot
pub fn pot_deposit(mut s: State, uid: usize, amount: u128, now: u32) -> State {
    if uid >= s.users.len() || amount == 0 {
        return s;
    }
    let bal = balance(&s.users[uid], now);
    let user = &mut s.users[uid];
    let diverted = add_amt(user.bribed, amount);
    if diverted > bal {
        return s;
    }
    user.bribed = diverted;
    s.total_diverted = add_amt(s.total_diverted, amount);
    s
}

/// Pull voting power back from the pot
pub fn pot_withdraw(mut s: State, uid: usize, amount: u128) -> State {
    if uid >= s.users.len() || amount == 0 {
        return s;
    }
    let user = &mut s.users[uid];
    if amount > user.bribed {
        return s;
    }
    user.bribed -= amount;
    s.total_diverted = sub_amt(s.total_diverted, amount);
    s
}

/// Claim a pot reward; with `also_deposit` it locks straight back into
/// the ledger
pub fn claim_reward(
    s: State,
    uid: usize,
    amount: u128,
    also_deposit: bool,
    now: u32,
) -> State {
    if !also_deposit {
        return s;
    }
    deposit(s, uid, amount, now)
}

/// Delegate the user's entire current power (nonce- and
/// deadline-checked)
pub fn delegate(mut s: State, uid: usize, nonce: u64, deadline: u32, now: u32) -> State {
    if uid >= s.users.len() || now > deadline {
        return s;
    }
    let bal = balance(&s.users[uid], now);
    let user = &mut s.users[uid];
    if nonce != user.nonce {
        return s;
    }
    user.nonce = user.nonce.saturating_add(1);
    user.delegated = bal;
    s
}

/// Governance: set the withdrawal delay (whole weeks, two-week minimum)
pub fn set_withdrawal_delay(mut s: State, delay: u32) -> State {
    let rounded = delay - delay % WEEK;
    if rounded < MIN_WITHDRAWAL_DELAY {
        return s;
    }
    s.params.withdrawal_delay = rounded;
    s
}

/// Governance: bounded, strictly-increasing supply adjustment
pub fn adjust_total_supply(mut s: State, new_supply: u128) -> State {
    if new_supply <= s.total_supply || new_supply < s.total_deposited {
        return s;
    }
    let ceiling = s.total_deposited.checked_mul(2).unwrap_or(u128::MAX);
    if new_supply > ceiling {
        return s;
    }
    s.total_supply = new_supply;
    s
}

/// Governance: register or reactivate a vault
pub fn register_vault(mut s: State, vault: usize) -> State {
    if vault < MAX_VAULT_IDS {
        s.active_vaults[vault] = true;
    }
    s
}

/// Governance: deactivate a vault
pub fn deactivate_vault(mut s: State, vault: usize) -> State {
    if vault < MAX_VAULT_IDS {
        s.active_vaults[vault] = false;
    }
    s
}
