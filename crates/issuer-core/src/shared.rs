//! Serialized access to one ledger from many threads.
//!
//! Every state-touching call holds the lock for its whole duration, so
//! `initialize` and `mint` execute in a total order and no caller observes a
//! partially applied update.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{IssuanceError, UpgradeError};
use crate::ledger::IssuanceLedger;
use crate::params::IssuanceParameters;
use crate::traits::TokenLedger;
use crate::types::{Address, Initialized, LedgerState, MintOutcome};
use crate::upgrade::LedgerSnapshot;

/// Cloneable handle to a ledger behind a mutex. Clones share the ledger.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    params: IssuanceParameters,
    inner: Arc<Mutex<IssuanceLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: IssuanceLedger) -> Self {
        Self {
            params: *ledger.params(),
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn params(&self) -> &IssuanceParameters {
        &self.params
    }

    /// Lock-free: parameters never change.
    pub fn current_period(&self, now_secs: u64) -> u64 {
        now_secs / self.params.seconds_per_period()
    }

    pub fn initialize(
        &self,
        reserved_reward: u128,
        external_total_supply: u128,
        now_secs: u64,
    ) -> Result<Initialized, IssuanceError> {
        self.inner
            .lock()
            .initialize(reserved_reward, external_total_supply, now_secs)
    }

    pub fn initialize_from_token(
        &self,
        token: &dyn TokenLedger,
        issuer: &Address,
        now_secs: u64,
    ) -> Result<Initialized, IssuanceError> {
        self.inner.lock().initialize_from_token(token, issuer, now_secs)
    }

    pub fn mint(
        &self,
        period: u64,
        locked_value: u128,
        total_locked_value: u128,
        all_locked_periods: u64,
    ) -> Result<u128, IssuanceError> {
        self.inner
            .lock()
            .mint(period, locked_value, total_locked_value, all_locked_periods)
    }

    pub fn mint_detailed(
        &self,
        period: u64,
        locked_value: u128,
        total_locked_value: u128,
        all_locked_periods: u64,
    ) -> Result<MintOutcome, IssuanceError> {
        self.inner
            .lock()
            .mint_detailed(period, locked_value, total_locked_value, all_locked_periods)
    }

    pub fn state(&self) -> LedgerState {
        *self.inner.lock().state()
    }

    pub fn reserved_reward(&self) -> u128 {
        self.inner.lock().reserved_reward()
    }

    pub fn export_state(&self) -> LedgerSnapshot {
        self.inner.lock().export_state()
    }

    pub fn verify_state(&self, reference: &LedgerSnapshot) -> Result<(), UpgradeError> {
        self.inner.lock().verify_state(reference)
    }

    pub fn finish_upgrade(&self, previous: &LedgerSnapshot) -> Result<(), UpgradeError> {
        self.inner.lock().finish_upgrade(previous)
    }

    /// Run `f` against the ledger while holding the lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut IssuanceLedger) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
