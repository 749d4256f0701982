//! Bounded arbitrary states for proofs

use crate::adversary::Op;
use kani::any;
use model_safety::*;

/// Amount bound keeps arithmetic in verifiable range
pub const MAX_AMOUNT: u128 = 1_000;

/// Arbitrary user with a consistent ledger
pub fn any_user_bounded() -> User {
    let mut user = User::default();
    let n: usize = any();
    kani::assume(n <= 3);

    let mut last_start: u32 = 0;
    for _ in 0..n {
        let amount: u128 = any();
        let start: u32 = any();
        kani::assume(amount > 0 && amount <= MAX_AMOUNT);
        kani::assume(start >= last_start && start < MAX_GROW * 4);
        last_start = start;
        user.deposits.push(Deposit { amount, start });
        user.deposit_total += amount;
    }

    let bribed: u128 = any();
    kani::assume(bribed <= user.deposit_total);
    user.bribed = bribed;

    user
}

/// Arbitrary system state with aggregates aligned to the users
pub fn any_state_bounded() -> State {
    let mut s = State::default();
    let n: usize = any();
    kani::assume(n >= 1 && n <= 2);

    for _ in 0..n {
        let user = any_user_bounded();
        s.total_deposited += user.deposit_total;
        s.total_supply += user.deposit_total;
        s.total_diverted += user.bribed;
        s.users.push(user);
    }
    s
}

/// Arbitrary bounded operation
pub fn any_op() -> Op {
    let op = Op {
        selector: any(),
        uid: any(),
        vault: any(),
        amount: any(),
        percent: any(),
        now: any(),
    };
    kani::assume(op.uid < MAX_USERS);
    kani::assume(op.vault < MAX_VAULT_IDS);
    kani::assume(op.amount <= MAX_AMOUNT);
    kani::assume(op.percent <= PERCENT_DENOM);
    kani::assume(op.now < MAX_GROW * 8);
    op
}
