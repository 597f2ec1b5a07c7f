//! Shared test helpers for scenario and property tests.

use issuer_core::ledger::IssuanceLedger;
use issuer_core::params::IssuanceParameters;
use issuer_core::types::LedgerState;

/// One-hour periods, so period `p` starts at `p * 3600`.
pub const HOUR: u64 = 3_600;

/// Period the fixture ledgers are initialized in.
pub const P0: u64 = 1_000;

/// k1 = 1, k2 = 100, awarded periods = 10, one-hour periods.
pub fn small_params() -> IssuanceParameters {
    IssuanceParameters::new(1, 100, 1, 10).expect("valid parameters")
}

/// Ledger initialized at the start of [`P0`].
pub fn initialized(reserved_reward: u128, total_supply: u128) -> IssuanceLedger {
    let mut ledger = IssuanceLedger::new(small_params());
    ledger
        .initialize(reserved_reward, total_supply, P0 * HOUR)
        .expect("initialize");
    ledger
}

/// Sum of both buffers' growth between two states.
pub fn buffer_growth(before: &LedgerState, after: &LedgerState) -> u128 {
    (after.current_supply_a - before.current_supply_a)
        + (after.current_supply_b - before.current_supply_b)
}

/// Exact formula on `u128` for inputs small enough not to overflow.
pub fn reference_amount(
    total_supply: u128,
    current_supply: u128,
    locked_value: u128,
    total_locked_value: u128,
    effective_periods: u128,
    mining_coefficient: u128,
) -> u128 {
    let d = total_locked_value * mining_coefficient;
    let amount = total_supply * locked_value * effective_periods / d
        - current_supply * locked_value * effective_periods / d;
    amount.max(1)
}
