//! Error types for the issuance ledger.
use thiserror::Error;

/// Invalid issuance parameters. Raised at construction; the caller must
/// rebuild the parameters with valid values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mining coefficient must be non-zero")] ZeroMiningCoefficient,
    #[error("hours per period must be non-zero")] ZeroHoursPerPeriod,
    #[error("locked periods coefficient must be non-zero")] ZeroLockedPeriodsCoefficient,
    #[error("awarded periods must be non-zero")] ZeroAwardedPeriods,
    #[error("seconds per period must be non-zero")] ZeroSecondsPerPeriod,
    #[error("period length overflow: {hours} hours")] PeriodLengthOverflow { hours: u64 },
}

/// Failures of `initialize` and `mint`. A failed call never mutates the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    #[error("ledger not initialized")] NotInitialized,
    #[error("ledger already initialized")] AlreadyInitialized,
    #[error("reserved reward leaves no circulating supply")] EmptyCirculatingSupply,
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("arithmetic underflow")] ArithmeticUnderflow,
    #[error("division by zero")] DivisionByZero,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpgradeError {
    #[error("state mismatch in {field}: expected {expected}, got {actual}")] StateMismatch { field: &'static str, expected: String, actual: String },
    #[error("serialization: {0}")] Serialization(String),
    #[error("corrupt state: {0}")] CorruptState(String),
    #[error(transparent)] Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum IssuerError {
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] Issuance(#[from] IssuanceError),
    #[error(transparent)] Upgrade(#[from] UpgradeError),
    #[error("settings: {0}")] Settings(String),
}
