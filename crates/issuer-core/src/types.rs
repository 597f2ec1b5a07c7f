//! Ledger data types: account addresses, state fields, mint outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address on the external token ledger.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    /// Parse 40 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; 20];
        hex::decode_to_slice(digits, &mut out)?;
        Ok(Self(out))
    }
}

/// Mutable accounting state of the ledger.
///
/// The two supply buffers carry no explicit ordering: the larger one is the
/// newer snapshot, the smaller one the supply as of the previous period.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LedgerState {
    /// Maximum issuable supply, captured once at initialization.
    pub total_supply: u128,
    pub current_supply_a: u128,
    pub current_supply_b: u128,
    /// Highest period minted with forward semantics.
    pub last_minted_period: u64,
}

impl LedgerState {
    /// Both buffers hold a non-zero value once the ledger is initialized.
    pub fn is_initialized(&self) -> bool {
        self.current_supply_a != 0 && self.current_supply_b != 0
    }

    /// The newer of the two supply snapshots.
    pub fn newest_supply(&self) -> u128 {
        self.current_supply_a.max(self.current_supply_b)
    }

    /// The older of the two supply snapshots.
    pub fn oldest_supply(&self) -> u128 {
        self.current_supply_a.min(self.current_supply_b)
    }
}

/// Emitted once when the ledger is initialized.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Initialized {
    pub reserved_reward: u128,
    pub total_supply: u128,
    /// The period recorded as `last_minted_period`.
    pub period: u64,
}

/// Which side of `last_minted_period` a mint fell on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MintBranch {
    /// `period > last_minted_period`: reads the newer buffer, rotates buffers.
    Forward,
    /// `period <= last_minted_period`: reads the older buffer, adds to the newer.
    Backfill,
    /// The read buffer already equals the total supply; nothing was minted.
    Saturated,
}

/// One of the two supply buffers.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupplyBuffer {
    A,
    B,
}

/// Result of a mint with the bookkeeping details exposed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintOutcome {
    pub period: u64,
    pub amount: u128,
    pub branch: MintBranch,
    /// Buffer written, `None` when saturated.
    pub buffer: Option<SupplyBuffer>,
}
