//! Protocol constants and default issuance parameters.
//!
//! Token amounts are in the smallest token unit (1 token = 10^18 units),
//! so supplies are carried as `u128`.

/// Smallest units per whole token.
pub const TOKEN: u128 = 1_000_000_000_000_000_000;

pub const SECONDS_PER_HOUR: u64 = 3_600;

/// Default period length: one day.
pub const DEFAULT_HOURS_PER_PERIOD: u64 = 24;

/// Default mining coefficient (k2).
pub const DEFAULT_MINING_COEFFICIENT: u64 = 2 * 365 * 1_000;

/// Default locked-periods coefficient (k1).
pub const DEFAULT_LOCKED_PERIODS_COEFFICIENT: u64 = 365;

/// Default cap on the duration bonus, in periods.
pub const DEFAULT_AWARDED_PERIODS: u64 = 365;

/// Prefix for environment-variable overrides of [`IssuerConfig`](crate::config::IssuerConfig).
pub const ENV_PREFIX: &str = "ISSUER";
