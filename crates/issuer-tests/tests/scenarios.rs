//! End-to-end ledger scenarios: initialization guards, forward and backfill
//! ordering, saturation, failure atomicity and upgrade hand-off.

use issuer_core::error::IssuanceError;
use issuer_core::ledger::IssuanceLedger;
use issuer_core::traits::{MemoryTokenLedger, TokenLedger};
use issuer_core::types::{Address, MintBranch, SupplyBuffer};
use issuer_core::SharedLedger;
use issuer_tests::helpers::*;

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[test]
fn uninitialized_mint_fails_without_change() {
    let mut ledger = IssuanceLedger::new(small_params());
    let before = ledger.export_state();
    for period in [0, P0, P0 + 1, u64::MAX] {
        assert_eq!(
            ledger.mint(period, 1_000, 10_000, 5),
            Err(IssuanceError::NotInitialized)
        );
    }
    assert!(ledger.verify_state(&before).is_ok());
}

#[test]
fn double_initialize_keeps_first_state() {
    let mut ledger = initialized(100_000, 1_000_000);
    let after_first = ledger.export_state();
    assert_eq!(
        ledger.initialize(100_000, 1_000_000, (P0 + 5) * HOUR),
        Err(IssuanceError::AlreadyInitialized)
    );
    assert!(ledger.verify_state(&after_first).is_ok());
}

#[test]
fn initialize_from_token_ledger() {
    let issuer = Address([0xEE; 20]);
    let mut token = MemoryTokenLedger::new();
    token.credit(Address([0x01; 20]), 600_000).unwrap();
    token.credit(Address([0x02; 20]), 300_000).unwrap();
    token.credit(issuer, 100_000).unwrap();
    assert_eq!(token.total_supply(), 1_000_000);

    let mut ledger = IssuanceLedger::new(small_params());
    let event = ledger
        .initialize_from_token(&token, &issuer, P0 * HOUR)
        .unwrap();
    assert_eq!(event.reserved_reward, 100_000);
    assert_eq!(ledger.state().current_supply_a, 900_000);
    assert_eq!(ledger.state().current_supply_b, 900_000);
    assert_eq!(ledger.state().last_minted_period, P0);
}

// ---------------------------------------------------------------------------
// Saturation
// ---------------------------------------------------------------------------

#[test]
fn fully_issued_supply_mints_nothing() {
    let mut ledger = initialized(0, 1_000_000);
    let before = *ledger.state();
    assert_eq!(ledger.mint(P0 + 1, 1_000, 10_000, 5).unwrap(), 0);
    assert_eq!(ledger.mint(P0, 1_000, 10_000, 5).unwrap(), 0);
    assert_eq!(*ledger.state(), before);
}

#[test]
fn supply_runs_down_to_cap() {
    let mut ledger = initialized(1_000, 1_000_000);
    let mut period = P0;
    let mut minted = 0u128;
    // A participant holding everything drains the remainder 11% at a time.
    for _ in 0..10_000 {
        period += 1;
        minted += ledger.mint(period, 10_000, 10_000, 10).unwrap();
        if ledger.is_saturated() || ledger.state().newest_supply() == 1_000_000 {
            break;
        }
    }
    assert_eq!(ledger.state().newest_supply(), 1_000_000);
    assert_eq!(minted, 1_000);
    assert_eq!(ledger.mint(period + 1, 10_000, 10_000, 10).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn forward_then_backfill() {
    let mut ledger = initialized(100_000, 1_000_000);

    let before = *ledger.state();
    let forward = ledger.mint_detailed(P0 + 1, 1_000, 10_000, 5).unwrap();
    let after_forward = *ledger.state();
    assert_eq!(forward.branch, MintBranch::Forward);
    assert_eq!(after_forward.last_minted_period, P0 + 1);
    // Exactly one buffer moved, by exactly the award.
    let moved_a = after_forward.current_supply_a != before.current_supply_a;
    let moved_b = after_forward.current_supply_b != before.current_supply_b;
    assert!(moved_a ^ moved_b);
    assert_eq!(buffer_growth(&before, &after_forward), forward.amount);

    let backfill = ledger.mint_detailed(P0, 1_000, 10_000, 5).unwrap();
    let after_backfill = *ledger.state();
    assert_eq!(backfill.branch, MintBranch::Backfill);
    assert_eq!(after_backfill.last_minted_period, P0 + 1);
    // The newer (larger) buffer takes the backfill award.
    let newer = if moved_a { SupplyBuffer::A } else { SupplyBuffer::B };
    assert_eq!(backfill.buffer, Some(newer));
    assert_eq!(
        after_backfill.newest_supply(),
        after_forward.newest_supply() + backfill.amount
    );
    assert_eq!(after_backfill.oldest_supply(), after_forward.oldest_supply());
    // Both read the pre-period supply, so the awards match.
    assert_eq!(backfill.amount, forward.amount);
}

#[test]
fn late_claims_do_not_see_current_period_awards() {
    let mut ledger = initialized(500_000, 1_000_000);
    ledger.mint(P0 + 1, 5_000, 10_000, 10).unwrap();
    let first_late = ledger.mint(P0, 1_000, 10_000, 3).unwrap();
    let second_late = ledger.mint(P0, 1_000, 10_000, 3).unwrap();
    // Backfill reads the older snapshot, which backfills never change.
    assert_eq!(first_late, second_late);
}

#[test]
fn skipping_periods_is_one_forward_step() {
    let mut ledger = initialized(100_000, 1_000_000);
    ledger.mint(P0 + 50, 1_000, 10_000, 5).unwrap();
    assert_eq!(ledger.state().last_minted_period, P0 + 50);
    let outcome = ledger.mint_detailed(P0 + 49, 1_000, 10_000, 5).unwrap();
    assert_eq!(outcome.branch, MintBranch::Backfill);
}

#[test]
fn formula_exactness_on_ledger() {
    let mut ledger = initialized(123_457, 9_876_543);
    let current = ledger.state().newest_supply();
    let amount = ledger.mint(P0 + 1, 777, 31_337, 4).unwrap();
    assert_eq!(
        amount,
        reference_amount(9_876_543, current, 777, 31_337, 5, 100)
    );
}

// ---------------------------------------------------------------------------
// Failure atomicity
// ---------------------------------------------------------------------------

#[test]
fn zero_total_locked_fails_atomically() {
    let mut ledger = initialized(100_000, 1_000_000);
    ledger.mint(P0 + 1, 1_000, 10_000, 5).unwrap();
    let before = ledger.export_state();
    assert_eq!(
        ledger.mint(P0 + 2, 1_000, 0, 5),
        Err(IssuanceError::DivisionByZero)
    );
    assert_eq!(
        ledger.mint(P0, 1_000, 0, 5),
        Err(IssuanceError::DivisionByZero)
    );
    assert!(ledger.verify_state(&before).is_ok());
}

// ---------------------------------------------------------------------------
// Upgrade hand-off
// ---------------------------------------------------------------------------

#[test]
fn upgraded_ledger_continues_identically() {
    let mut old = initialized(100_000, 1_000_000);
    old.mint(P0 + 1, 1_000, 10_000, 5).unwrap();
    old.mint(P0, 2_500, 10_000, 9).unwrap();

    let bytes = old.export_state().to_bytes().unwrap();
    let snapshot = issuer_core::LedgerSnapshot::from_bytes(&bytes).unwrap();
    let mut new = IssuanceLedger::new(small_params());
    new.finish_upgrade(&snapshot).unwrap();
    new.verify_state(&old.export_state()).unwrap();

    for (period, locked) in [(P0 + 2, 100u128), (P0 + 1, 400), (P0 + 3, 9_000)] {
        assert_eq!(
            old.mint(period, locked, 10_000, 6).unwrap(),
            new.mint(period, locked, 10_000, 6).unwrap()
        );
    }
    assert_eq!(old.state(), new.state());
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

#[test]
fn shared_ledger_serializes_forward_mints() {
    let shared = SharedLedger::new(initialized(500_000, 1_000_000));
    let before = shared.state();
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let s = shared.clone();
            std::thread::spawn(move || {
                (0..25u64)
                    .map(|i| s.mint(P0 + 1 + t * 25 + i, 100, 10_000, 2).unwrap())
                    .sum::<u128>()
            })
        })
        .collect();
    let minted: u128 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let after = shared.state();
    // Forward and backfill writes both land on the newest buffer.
    assert_eq!(after.newest_supply(), before.newest_supply() + minted);
    assert_eq!(shared.reserved_reward(), 500_000 - minted);
    assert!(after.last_minted_period >= P0 + 25);
}
