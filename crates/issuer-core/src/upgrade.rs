//! State export, import and verification for swapping ledger implementations.
//!
//! A [`LedgerSnapshot`] is plain data: the parameter inputs and the four
//! mutable state fields. A replacement ledger takes over accounting history
//! with [`IssuanceLedger::finish_upgrade`] and proves the copy with
//! [`IssuanceLedger::verify_state`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::UpgradeError;
use crate::ledger::IssuanceLedger;
use crate::params::IssuanceParameters;
use crate::types::LedgerState;

/// Every persisted field of an [`IssuanceLedger`].
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct LedgerSnapshot {
    pub hours_per_period: u64,
    pub mining_coefficient: u64,
    pub locked_periods_coefficient: u64,
    pub awarded_periods: u64,
    pub total_supply: u128,
    pub current_supply_a: u128,
    pub current_supply_b: u128,
    pub last_minted_period: u64,
}

impl LedgerSnapshot {
    /// Canonical encoding (bincode, standard config).
    pub fn to_bytes(&self) -> Result<Vec<u8>, UpgradeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| UpgradeError::Serialization(e.to_string()))
    }

    /// Decode a snapshot produced by [`to_bytes`](Self::to_bytes).
    ///
    /// Trailing bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, UpgradeError> {
        let (snapshot, read): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| UpgradeError::Serialization(e.to_string()))?;
        if read != bytes.len() {
            return Err(UpgradeError::Serialization(format!(
                "{} trailing bytes",
                bytes.len() - read
            )));
        }
        Ok(snapshot)
    }

    pub fn parameters(&self) -> Result<IssuanceParameters, UpgradeError> {
        Ok(IssuanceParameters::new(
            self.hours_per_period,
            self.mining_coefficient,
            self.locked_periods_coefficient,
            self.awarded_periods,
        )?)
    }

    pub fn state(&self) -> LedgerState {
        LedgerState {
            total_supply: self.total_supply,
            current_supply_a: self.current_supply_a,
            current_supply_b: self.current_supply_b,
            last_minted_period: self.last_minted_period,
        }
    }

    /// Field name, expected, actual for the first field that differs.
    fn first_difference(&self, actual: &Self) -> Option<(&'static str, String, String)> {
        macro_rules! check {
            ($($field:ident),+ $(,)?) => {
                $(
                    if self.$field != actual.$field {
                        return Some((
                            stringify!($field),
                            self.$field.to_string(),
                            actual.$field.to_string(),
                        ));
                    }
                )+
            };
        }
        check!(
            hours_per_period,
            mining_coefficient,
            locked_periods_coefficient,
            awarded_periods,
            total_supply,
            current_supply_a,
            current_supply_b,
            last_minted_period,
        );
        None
    }
}

impl IssuanceLedger {
    /// Read-only copy of every parameter and state field.
    pub fn export_state(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            hours_per_period: self.params.hours_per_period(),
            mining_coefficient: self.params.mining_coefficient(),
            locked_periods_coefficient: self.params.locked_periods_coefficient(),
            awarded_periods: self.params.awarded_periods(),
            total_supply: self.state.total_supply,
            current_supply_a: self.state.current_supply_a,
            current_supply_b: self.state.current_supply_b,
            last_minted_period: self.state.last_minted_period,
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// # Errors
    ///
    /// - [`UpgradeError::Config`] if the snapshot's parameters are invalid
    /// - [`UpgradeError::CorruptState`] if exactly one buffer is zero, or
    ///   the older buffer exceeds the total supply
    pub fn from_snapshot(snapshot: &LedgerSnapshot) -> Result<Self, UpgradeError> {
        let params = snapshot.parameters()?;
        let state = snapshot.state();
        check_state(&state)?;
        Ok(Self { params, state })
    }

    /// Compare this ledger against `reference` field by field.
    ///
    /// # Errors
    ///
    /// [`UpgradeError::StateMismatch`] naming the first differing field.
    pub fn verify_state(&self, reference: &LedgerSnapshot) -> Result<(), UpgradeError> {
        match reference.first_difference(&self.export_state()) {
            None => Ok(()),
            Some((field, expected, actual)) => {
                warn!(field, %expected, %actual, "issuer: state verification failed");
                Err(UpgradeError::StateMismatch {
                    field,
                    expected,
                    actual,
                })
            }
        }
    }

    /// Take over the accounting state of `previous`.
    ///
    /// Parameters stay with this ledger; only the four mutable fields move.
    pub fn finish_upgrade(&mut self, previous: &LedgerSnapshot) -> Result<(), UpgradeError> {
        let state = previous.state();
        check_state(&state)?;
        self.state = state;
        info!(
            total_supply = %state.total_supply,
            last_minted_period = state.last_minted_period,
            "issuer: upgrade state copied"
        );
        Ok(())
    }
}

fn check_state(state: &LedgerState) -> Result<(), UpgradeError> {
    let zero_a = state.current_supply_a == 0;
    let zero_b = state.current_supply_b == 0;
    if zero_a != zero_b {
        return Err(UpgradeError::CorruptState(
            "exactly one supply buffer is zero".to_string(),
        ));
    }
    if state.oldest_supply() > state.total_supply {
        return Err(UpgradeError::CorruptState(
            "issued supply exceeds total supply".to_string(),
        ));
    }
    Ok(())
}
