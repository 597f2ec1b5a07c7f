//! Property-based tests for ledger invariants under randomized mint sequences.
//!
//! Invariants checked:
//! - Both supply buffers never decrease
//! - The older buffer never exceeds the total supply
//! - Every non-saturated successful mint awards at least one unit
//! - Saturated reads award zero and leave state untouched
//! - Failed mints leave state untouched
//! - The award matches the two-floor reference formula

use issuer_core::error::IssuanceError;
use issuer_core::ledger::{mint_amount, IssuanceLedger};
use issuer_core::params::IssuanceParameters;
use issuer_core::types::MintBranch;
use issuer_tests::helpers::*;
use proptest::prelude::*;

/// (period offset from P0, locked, total locked, all locked periods).
fn mint_strategy() -> impl Strategy<Value = (i64, u128, u128, u64)> {
    (-5i64..10, 0u128..=1_000_000, 0u128..=1_000_000, 0u64..=30)
        .prop_map(|(offset, locked, extra, periods)| (offset, locked, locked + extra, periods))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn buffers_never_decrease(
        reserved in 1u128..=1_000_000,
        mints in proptest::collection::vec(mint_strategy(), 1..60),
    ) {
        let mut ledger = initialized(reserved, 1_000_001);
        for (offset, locked, total_locked, periods) in mints {
            let period = (P0 as i64 + offset) as u64;
            let before = *ledger.state();
            match ledger.mint_detailed(period, locked, total_locked, periods) {
                Ok(outcome) => {
                    let after = *ledger.state();
                    prop_assert!(after.current_supply_a >= before.current_supply_a);
                    prop_assert!(after.current_supply_b >= before.current_supply_b);
                    prop_assert!(after.oldest_supply() <= after.total_supply);
                    prop_assert!(after.last_minted_period >= before.last_minted_period);
                    if outcome.branch == MintBranch::Saturated {
                        prop_assert_eq!(outcome.amount, 0);
                        prop_assert_eq!(after, before);
                    } else {
                        prop_assert!(outcome.amount >= 1);
                        prop_assert_eq!(after.newest_supply(), before.newest_supply() + outcome.amount);
                    }
                }
                Err(e) => {
                    // Only an empty lock pool can fail with these magnitudes.
                    prop_assert_eq!(e, IssuanceError::DivisionByZero);
                    prop_assert_eq!(total_locked, 0);
                    prop_assert_eq!(*ledger.state(), before);
                }
            }
        }
    }

    #[test]
    fn award_matches_reference(
        total in 2u128..=1_000_000_000_000,
        issued_bps in 0u128..10_000,
        locked in 0u128..=1_000_000,
        extra in 1u128..=1_000_000,
        effective in 1u64..=1_000,
        k2 in 1u64..=1_000_000,
    ) {
        let current = total * issued_bps / 10_000;
        let total_locked = locked + extra;
        let got = mint_amount(total, current, locked, total_locked, effective, k2).unwrap();
        prop_assert_eq!(
            got,
            reference_amount(total, current, locked, total_locked, effective as u128, k2 as u128)
        );
    }

    #[test]
    fn award_never_exceeds_remainder_when_bonus_below_one(
        reserved in 1u128..=1_000_000,
        locked in 0u128..=10_000,
        periods in 0u64..=100,
    ) {
        // effective periods <= 11 < k2 = 100: a whole-pool participant gets
        // at most 11% of the remainder, rounded up to one unit.
        let mut ledger = initialized(reserved, 10_000_000);
        let amount = ledger.mint(P0 + 1, locked, 10_000, periods).unwrap();
        prop_assert!(amount <= reserved);
        prop_assert!(ledger.state().newest_supply() <= 10_000_000);
    }

    #[test]
    fn backfill_awards_are_stable(
        forward_locked in 1u128..=10_000,
        late_locked in 1u128..=10_000,
        repeats in 1usize..10,
    ) {
        let mut ledger = initialized(400_000, 1_000_000);
        ledger.mint(P0 + 1, forward_locked, 10_000, 10).unwrap();
        let first = ledger.mint(P0, late_locked, 10_000, 10).unwrap();
        for _ in 0..repeats {
            prop_assert_eq!(ledger.mint(P0, late_locked, 10_000, 10).unwrap(), first);
        }
    }

    #[test]
    fn snapshot_roundtrip_preserves_behaviour(
        mints in proptest::collection::vec(mint_strategy(), 0..20),
        next in mint_strategy(),
    ) {
        let mut ledger = initialized(250_000, 1_000_000);
        for (offset, locked, total_locked, periods) in mints {
            let _ = ledger.mint((P0 as i64 + offset) as u64, locked, total_locked, periods);
        }
        let bytes = ledger.export_state().to_bytes().unwrap();
        let snapshot = issuer_core::LedgerSnapshot::from_bytes(&bytes).unwrap();
        let mut restored = IssuanceLedger::from_snapshot(&snapshot).unwrap();

        let (offset, locked, total_locked, periods) = next;
        let period = (P0 as i64 + offset) as u64;
        prop_assert_eq!(
            ledger.mint(period, locked, total_locked, periods),
            restored.mint(period, locked, total_locked, periods)
        );
        prop_assert_eq!(ledger.state(), restored.state());
    }

    #[test]
    fn zero_parameters_never_construct(
        hours in 0u64..=2,
        k2 in 0u64..=2,
        k1 in 0u64..=2,
        awarded in 0u64..=2,
    ) {
        let result = IssuanceParameters::new(hours, k2, k1, awarded);
        let any_zero = hours == 0 || k2 == 0 || k1 == 0 || awarded == 0;
        prop_assert_eq!(result.is_err(), any_zero);
    }
}
