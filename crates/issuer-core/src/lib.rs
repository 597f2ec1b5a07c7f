//! # issuer-core
//! Token-issuance accounting for a staking reward protocol.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! - [`ledger::IssuanceLedger`]: dual-buffer issued-supply tracking and the
//!   proportional-share mint formula, with a hard supply cap.
//! - [`upgrade`]: plain-data snapshots for handing state to a new ledger.
//! - [`shared::SharedLedger`]: mutex-serialized handle for concurrent callers.
//! - [`traits::TokenLedger`]: the external token contract read at initialization.

pub mod config;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod params;
pub mod period;
pub mod shared;
pub mod traits;
pub mod types;
pub mod upgrade;

pub use ledger::{mint_amount, quote, IssuanceLedger};
pub use params::IssuanceParameters;
pub use shared::SharedLedger;
pub use upgrade::LedgerSnapshot;
