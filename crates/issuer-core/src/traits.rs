//! Trait interfaces for the ledger's external collaborators.
//!
//! - [`TokenLedger`] — the fungible token contract, queried once at
//!   initialization for its total supply and the issuer's reserve balance.

use std::collections::HashMap;

use crate::types::Address;

/// Read-only view of the external token ledger.
pub trait TokenLedger: Send + Sync {
    /// Total supply of the token in smallest units.
    fn total_supply(&self) -> u128;

    /// Balance held by `owner`. Unknown owners hold zero.
    fn balance_of(&self, owner: &Address) -> u128;
}

/// In-memory token ledger for tests and offline simulation.
///
/// The total supply is the sum of all balances.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenLedger {
    balances: HashMap<Address, u128>,
}

impl MemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `owner`. Returns `None` if the balance or the
    /// total supply would overflow.
    pub fn credit(&mut self, owner: Address, amount: u128) -> Option<u128> {
        self.total_supply().checked_add(amount)?;
        let balance = self.balances.entry(owner).or_insert(0);
        *balance = balance.checked_add(amount)?;
        Some(*balance)
    }

    /// Move `amount` from one owner to another. Returns `false` on
    /// insufficient funds, leaving balances unchanged.
    pub fn transfer(&mut self, from: &Address, to: Address, amount: u128) -> bool {
        let Some(available) = self.balances.get(from).copied() else {
            return amount == 0;
        };
        if available < amount {
            return false;
        }
        self.balances.insert(*from, available - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        true
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn total_supply(&self) -> u128 {
        self.balances.values().sum()
    }

    fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }
}
