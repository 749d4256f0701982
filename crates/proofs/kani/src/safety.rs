//! Ledger invariant proofs

use crate::adversary::adversary_step;
use crate::generators::*;
use kani::any;
use model_safety::*;

const MAX_STEPS: u8 = 3;

/// Conservation: the global deposited total always equals the sum of
/// every user's ledger, across adversarial operation sequences
#[kani::proof]
#[kani::unwind(8)]
fn conservation_across_adversary_sequences() {
    let mut s = any_state_bounded();
    kani::assume(conservation_ok(&s));
    kani::assume(user_totals_ok(&s));
    kani::assume(diverted_ok(&s));

    let mut steps: u8 = any();
    steps %= MAX_STEPS;

    for _ in 0..steps {
        s = adversary_step(s, any_op());
        kani::assert(conservation_ok(&s), "deposited total must equal ledger sum");
        kani::assert(user_totals_ok(&s), "per-user totals must not diverge");
        kani::assert(diverted_ok(&s), "pot totals must match per-user bribed sums");
    }
}

/// LIFO withdrawal: a request smaller than the newest deposit leaves the
/// remainder with the original start and older entries untouched
#[kani::proof]
#[kani::unwind(8)]
fn lifo_pop_preserves_remainder_start() {
    let mut s = State::default();
    s.users.push(User::default());

    let a1: u128 = any();
    let a2: u128 = any();
    let t1: u32 = any();
    let t2: u32 = any();
    let w: u128 = any();
    kani::assume(a1 > 0 && a1 <= MAX_AMOUNT);
    kani::assume(a2 > 1 && a2 <= MAX_AMOUNT);
    kani::assume(t1 < t2 && t2 < MAX_GROW);
    kani::assume(w > 0 && w < a2);

    s = deposit(s, 0, a1, t1);
    s = deposit(s, 0, a2, t2);
    s = request_withdrawal(s, 0, w, t2);

    let user = &s.users[0];
    kani::assert(user.deposits.len() == 2, "older entry must be untouched");
    kani::assert(user.deposits[0].amount == a1, "older amount unchanged");
    kani::assert(user.deposits[0].start == t1, "older start unchanged");
    kani::assert(user.deposits[1].amount == a2 - w, "remainder shrinks by w");
    kani::assert(
        user.deposits[1].start == t2,
        "remainder keeps the original start",
    );
}

/// The stake aggregate can never reach 100%
#[kani::proof]
#[kani::unwind(8)]
fn stake_aggregate_strictly_below_full() {
    let mut s = any_state_bounded();
    kani::assume(stake_cap_ok(&s));

    let op = any_op();
    s = stake(s, op.uid, op.vault, op.percent);
    kani::assert(stake_cap_ok(&s), "stake aggregate must stay below 100%");
}

/// Pot bound: diverting never pushes bribed past the balance at the
/// moment of the call
#[kani::proof]
#[kani::unwind(8)]
fn pot_divert_bounded_by_balance() {
    let mut s = any_state_bounded();
    let op = any_op();
    kani::assume(op.uid < s.users.len());

    let bal = balance(&s.users[op.uid], op.now);
    let before = s.users[op.uid].bribed;
    let s2 = pot_deposit(s, op.uid, op.amount, op.now);
    let after = s2.users[op.uid].bribed;
    kani::assert(
        after == before || after <= bal,
        "diverting past the balance must be rejected",
    );
}

/// Withdrawal never underflows the supply: the clamp holds even when
/// the converted amount exceeds what the aggregate remembers
#[kani::proof]
#[kani::unwind(8)]
fn supply_clamp_never_underflows() {
    let mut s = any_state_bounded();
    // Desynchronize the supply on purpose
    let supply: u128 = any();
    kani::assume(supply <= MAX_AMOUNT);
    s.total_supply = supply;

    let op = any_op();
    s = request_withdrawal(s, op.uid, op.amount, op.now);
    kani::assert(s.total_supply <= u128::MAX, "supply must remain representable");
    if s.total_deposited == 0 {
        kani::assert(s.total_supply == 0, "empty system has zero supply");
    }
}

/// Delegation reconcile: after any withdrawal request the delegated
/// snapshot fits the remaining balance
#[kani::proof]
#[kani::unwind(8)]
fn delegation_trimmed_on_withdrawal() {
    let mut s = any_state_bounded();
    let op = any_op();
    kani::assume(op.uid < s.users.len());

    // Delegate everything first, then withdraw at the same instant
    let nonce = s.users[op.uid].nonce;
    s = delegate(s, op.uid, nonce, op.now, op.now);
    let s2 = request_withdrawal(s, op.uid, op.amount, op.now);

    let bal_after = balance(&s2.users[op.uid], op.now);
    kani::assert(
        s2.users[op.uid].delegated <= bal_after,
        "delegated votes must not exceed the supported balance",
    );
}
