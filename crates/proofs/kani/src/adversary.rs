//! Adversarial operation driver
//!
//! Applies one ledger transition chosen by an arbitrary selector. Proofs
//! run short sequences of these to show the invariants survive any
//! interleaving of user operations.

use model_safety::*;

/// One adversarial step described by plain data
#[derive(Clone, Copy, Debug)]
pub struct Op {
    pub selector: u8,
    pub uid: usize,
    pub vault: usize,
    pub amount: u128,
    pub percent: u32,
    pub now: u32,
}

/// Apply the operation `op` to `s`. Unknown selectors are no-ops, like
/// every other invalid operation in the model.
pub fn adversary_step(s: State, op: Op) -> State {
    match op.selector % 8 {
        0 => deposit(s, op.uid, op.amount, op.now),
        1 => request_withdrawal(s, op.uid, op.amount, op.now),
        2 => finalize_withdrawal(s, op.uid, op.now),
        3 => stake(s, op.uid, op.vault, op.percent),
        4 => unstake(s, op.uid, op.vault, op.percent),
        5 => pot_deposit(s, op.uid, op.amount, op.now),
        6 => pot_withdraw(s, op.uid, op.amount),
        7 => claim_reward(s, op.uid, op.amount, op.percent % 2 == 0, op.now),
        _ => s,
    }
}
