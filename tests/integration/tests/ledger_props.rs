//! Property tests over random operation sequences

use model_safety::*;
use proptest::prelude::*;

const T0: u32 = 1_700_000_000;

#[derive(Debug, Clone)]
enum Action {
    Deposit { uid: usize, amount: u128 },
    Withdraw { uid: usize, amount: u128 },
    Finalize { uid: usize },
    Stake { uid: usize, vault: usize, percent: u32 },
    Unstake { uid: usize, vault: usize, percent: u32 },
    PotDeposit { uid: usize, amount: u128 },
    PotWithdraw { uid: usize, amount: u128 },
    Delegate { uid: usize },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..3, 0u128..10_000).prop_map(|(uid, amount)| Action::Deposit { uid, amount }),
        (0usize..3, 0u128..10_000).prop_map(|(uid, amount)| Action::Withdraw { uid, amount }),
        (0usize..3).prop_map(|uid| Action::Finalize { uid }),
        (0usize..3, 0usize..MAX_VAULT_IDS, 0u32..60_000)
            .prop_map(|(uid, vault, percent)| Action::Stake { uid, vault, percent }),
        (0usize..3, 0usize..MAX_VAULT_IDS, 0u32..60_000)
            .prop_map(|(uid, vault, percent)| Action::Unstake { uid, vault, percent }),
        (0usize..3, 0u128..10_000).prop_map(|(uid, amount)| Action::PotDeposit { uid, amount }),
        (0usize..3, 0u128..10_000).prop_map(|(uid, amount)| Action::PotWithdraw { uid, amount }),
        (0usize..3).prop_map(|uid| Action::Delegate { uid }),
    ]
}

fn apply(s: State, action: &Action, now: u32) -> State {
    match *action {
        Action::Deposit { uid, amount } => deposit(s, uid, amount, now),
        Action::Withdraw { uid, amount } => request_withdrawal(s, uid, amount, now),
        Action::Finalize { uid } => finalize_withdrawal(s, uid, now),
        Action::Stake { uid, vault, percent } => stake(s, uid, vault, percent),
        Action::Unstake { uid, vault, percent } => unstake(s, uid, vault, percent),
        Action::PotDeposit { uid, amount } => pot_deposit(s, uid, amount, now),
        Action::PotWithdraw { uid, amount } => pot_withdraw(s, uid, amount),
        Action::Delegate { uid } => {
            let nonce = if uid < s.users.len() { s.users[uid].nonce } else { 0 };
            delegate(s, uid, nonce, now + 1, now)
        }
    }
}

proptest! {
    /// Every invariant survives any sequence of operations applied at
    /// monotonically increasing times.
    #[test]
    fn prop_invariants_hold_across_sequences(
        actions in proptest::collection::vec(action_strategy(), 0..40),
    ) {
        let mut s = State::default();
        for _ in 0..3 {
            s.users.push(User::default());
        }

        let mut now = T0;
        for action in &actions {
            now += WEEK / 7; // one day per operation
            s = apply(s, action, now);

            prop_assert!(conservation_ok(&s));
            prop_assert!(user_totals_ok(&s));
            prop_assert!(diverted_ok(&s));
            prop_assert!(stake_cap_ok(&s));
            prop_assert!(ledgers_ordered_ok(&s));
        }
    }

    /// The newest-first scan with matured backfill computes the same
    /// accrued power as a naive walk over every entry.
    #[test]
    fn prop_short_circuit_scan_matches_naive(
        amounts in proptest::collection::vec(1u128..1_000_000, 1..6),
        gaps in proptest::collection::vec(0u32..MAX_GROW, 1..6),
        elapsed in 0u32..4 * MAX_GROW,
    ) {
        let mut user = User::default();
        let mut t = T0;
        for (amount, gap) in amounts.iter().zip(gaps.iter()) {
            t += gap;
            user.deposits.push(Deposit { amount: *amount, start: t });
            user.deposit_total += amount;
        }
        let now = t + elapsed;

        let (deposit_balance, accrued) = earned_power(&user, now);

        let naive: u128 = user
            .deposits
            .iter()
            .map(|d| earned(d.amount, now.saturating_sub(d.start)))
            .sum();

        prop_assert_eq!(deposit_balance, user.deposit_total);
        prop_assert_eq!(accrued, naive);
    }

    /// Voting power never decreases as time passes.
    #[test]
    fn prop_balance_monotone_in_time(
        amounts in proptest::collection::vec(1u128..1_000_000, 1..6),
        t1 in 0u32..5 * MAX_GROW,
        t2 in 0u32..5 * MAX_GROW,
    ) {
        let mut user = User::default();
        for (i, amount) in amounts.iter().enumerate() {
            user.deposits.push(Deposit { amount: *amount, start: T0 + i as u32 });
            user.deposit_total += amount;
        }
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        prop_assert!(balance(&user, T0 + lo) <= balance(&user, T0 + hi));
    }
}
