//! End-to-end scenario tests for the voting-power ledger
//!
//! Note: These tests drive the pure ledger model, which mirrors the
//! on-chain state transitions one-to-one. For full E2E testing the
//! program must be compiled to a .so file and deployed to a test
//! validator.

use model_safety::*;
use solana_program_test::tokio;

const T0: u32 = 1_700_000_000;

fn system_with_users(n: usize) -> State {
    let mut s = State::default();
    for _ in 0..n {
        s.users.push(User::default());
    }
    s
}

/// A deposit's balance walks the growth curve: principal at t0, +50% at
/// half maturity, doubled at the cap, flat afterwards.
#[tokio::test]
async fn test_balance_follows_growth_curve() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);

    assert_eq!(balance(&s.users[0], T0), 100);
    assert_eq!(balance(&s.users[0], T0 + MAX_GROW / 2), 150);
    assert_eq!(balance(&s.users[0], T0 + MAX_GROW), 200);
    assert_eq!(balance(&s.users[0], T0 + MAX_GROW * 5), 200);
}

/// The full withdrawal round trip at the doubled conversion rate:
/// withdrawing 40 of 100 principal at full maturity relinquishes 80 of
/// voting power, finalize before the delay fails, after it pays 40.
#[tokio::test]
async fn test_matured_withdrawal_round_trip() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);

    let now = T0 + MAX_GROW;
    s = request_withdrawal(s, 0, 40, now);

    assert_eq!(s.users[0].deposit_total, 60);
    assert_eq!(s.users[0].pending_withdrawal, 40);
    assert_eq!(s.total_deposited, 60);
    assert_eq!(s.total_supply, 20);

    // Finalize before the delay: state unchanged
    let early = finalize_withdrawal(s.clone(), 0, now + s.params.withdrawal_delay - 1);
    assert_eq!(early.users[0].pending_withdrawal, 40);

    // Finalize on time clears the request
    let ready_at = now + s.params.withdrawal_delay;
    let s = finalize_withdrawal(s, 0, ready_at);
    assert_eq!(s.users[0].pending_withdrawal, 0);
}

/// Withdrawing and immediately re-depositing does not restore accrued
/// growth: the growth clock resets for re-deposited funds.
#[tokio::test]
async fn test_growth_not_round_trip_preserving() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);

    let now = T0 + MAX_GROW;
    assert_eq!(balance(&s.users[0], now), 200);

    s = request_withdrawal(s, 0, 100, now);
    s = deposit(s, 0, 100, now);
    assert_eq!(balance(&s.users[0], now), 100);
    assert!(conservation_ok(&s));
}

/// LIFO withdrawal: with deposits [D1@t0, D2@t1] and a withdrawal
/// smaller than D2, the remainder keeps t1 and D1 is untouched.
#[tokio::test]
async fn test_lifo_withdrawal_preserves_old_growth() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);
    s = deposit(s, 0, 80, T0 + WEEK);

    s = request_withdrawal(s, 0, 30, T0 + WEEK);

    let user = &s.users[0];
    assert_eq!(user.deposits.len(), 2);
    assert_eq!(user.deposits[0].amount, 100);
    assert_eq!(user.deposits[0].start, T0);
    assert_eq!(user.deposits[1].amount, 50);
    assert_eq!(user.deposits[1].start, T0 + WEEK);
    assert!(ledgers_ordered_ok(&s));
}

/// Multiple users share only the global aggregates; conservation holds
/// through an interleaved deposit/withdraw/stake/pot sequence.
#[tokio::test]
async fn test_multi_user_conservation() {
    let mut s = system_with_users(3);

    s = deposit(s, 0, 1_000, T0);
    s = deposit(s, 1, 500, T0 + WEEK);
    s = deposit(s, 2, 250, T0 + 2 * WEEK);
    s = pot_deposit(s, 0, 400, T0 + 2 * WEEK);
    s = stake(s, 1, 0, 50_000);
    s = request_withdrawal(s, 2, 100, T0 + 3 * WEEK);
    s = deposit(s, 0, 10, T0 + 4 * WEEK);
    s = pot_withdraw(s, 0, 150);
    s = request_withdrawal(s, 0, 600, T0 + 10 * WEEK);

    assert!(conservation_ok(&s));
    assert!(user_totals_ok(&s));
    assert!(diverted_ok(&s));
    assert!(stake_cap_ok(&s));
    assert!(ledgers_ordered_ok(&s));
}

/// Governance supply adjustments respect the band: below the deposited
/// total and above twice the deposited total are rejected; in-band
/// strictly-increasing values are accepted.
#[tokio::test]
async fn test_supply_adjustment_band() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 1_000, T0);
    assert_eq!(s.total_supply, 1_000);

    // Below the deposited total: rejected
    let rejected = adjust_total_supply(s.clone(), 999);
    assert_eq!(rejected.total_supply, 1_000);

    // More than double: rejected
    let rejected = adjust_total_supply(s.clone(), 2_001);
    assert_eq!(rejected.total_supply, 1_000);

    // In band: accepted
    s = adjust_total_supply(s, 1_600);
    assert_eq!(s.total_supply, 1_600);

    // Not strictly increasing: rejected
    let rejected = adjust_total_supply(s.clone(), 1_600);
    assert_eq!(rejected.total_supply, 1_600);
}

/// Withdrawal requests accumulate into one outstanding request whose
/// delay restarts for the combined amount.
#[tokio::test]
async fn test_requests_accumulate() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);

    s = request_withdrawal(s, 0, 10, T0);
    let first_end = s.users[0].withdrawal_end;
    s = request_withdrawal(s, 0, 20, T0 + WEEK);

    assert_eq!(s.users[0].pending_withdrawal, 30);
    assert!(s.users[0].withdrawal_end > first_end);
    assert_eq!(
        s.users[0].withdrawal_end,
        T0 + WEEK + s.params.withdrawal_delay
    );
}

/// Exiting through a heavy pot position automatically releases pot
/// collateral; the user never unwinds by hand.
#[tokio::test]
async fn test_exit_unwinds_pot_collateral() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);
    s = pot_deposit(s, 0, 90, T0);
    assert_eq!(s.total_diverted, 90);

    s = request_withdrawal(s, 0, 50, T0);
    assert_eq!(s.users[0].bribed, 50);
    assert_eq!(s.total_diverted, 50);
    assert!(diverted_ok(&s));
}

/// Delegated votes shrink with the balance that backs them.
#[tokio::test]
async fn test_delegation_follows_balance_down() {
    let mut s = system_with_users(1);
    s = deposit(s, 0, 100, T0);
    s = delegate(s, 0, 0, T0, T0);
    assert_eq!(s.users[0].delegated, 100);

    s = request_withdrawal(s, 0, 30, T0);
    assert_eq!(s.users[0].delegated, 70);
    assert!(delegation_bounded_ok(&s, T0));
}
