//! Issuer configuration: issuance parameters plus logging settings.
//!
//! Sources are layered: built-in defaults, then an optional file (TOML, JSON
//! or YAML by extension), then `ISSUER_*` environment variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AWARDED_PERIODS, DEFAULT_HOURS_PER_PERIOD, DEFAULT_LOCKED_PERIODS_COEFFICIENT,
    DEFAULT_MINING_COEFFICIENT, ENV_PREFIX,
};
use crate::error::{ConfigError, IssuerError};
use crate::params::IssuanceParameters;

/// Configuration for an issuer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    pub hours_per_period: u64,
    pub mining_coefficient: u64,
    pub locked_periods_coefficient: u64,
    pub awarded_periods: u64,
    /// Log level filter string (e.g. "info", "debug", "issuer_core=trace").
    pub log_level: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            hours_per_period: DEFAULT_HOURS_PER_PERIOD,
            mining_coefficient: DEFAULT_MINING_COEFFICIENT,
            locked_periods_coefficient: DEFAULT_LOCKED_PERIODS_COEFFICIENT,
            awarded_periods: DEFAULT_AWARDED_PERIODS,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl IssuerConfig {
    /// Load defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, IssuerError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| IssuerError::Settings(e.to_string()))
    }

    /// Validate the issuance fields.
    pub fn parameters(&self) -> Result<IssuanceParameters, ConfigError> {
        IssuanceParameters::new(
            self.hours_per_period,
            self.mining_coefficient,
            self.locked_periods_coefficient,
            self.awarded_periods,
        )
    }
}
