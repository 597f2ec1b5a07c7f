//! Immutable issuance parameters.
//!
//! Fixed when the ledger is constructed and never changed afterwards. Every
//! field is validated non-zero here so the ledger's arithmetic can rely on
//! non-zero divisors.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AWARDED_PERIODS, DEFAULT_HOURS_PER_PERIOD, DEFAULT_LOCKED_PERIODS_COEFFICIENT,
    DEFAULT_MINING_COEFFICIENT, SECONDS_PER_HOUR,
};
use crate::error::ConfigError;

/// Parameters of the mint formula and the period clock.
///
/// # Examples
///
/// ```
/// use issuer_core::params::IssuanceParameters;
/// let params = IssuanceParameters::new(24, 100, 1, 10).unwrap();
/// assert_eq!(params.seconds_per_period(), 86_400);
/// assert!(IssuanceParameters::new(24, 0, 1, 10).is_err());
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IssuanceParameters {
    hours_per_period: u64,
    seconds_per_period: u64,
    mining_coefficient: u64,
    locked_periods_coefficient: u64,
    awarded_periods: u64,
}

impl IssuanceParameters {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    ///
    /// A [`ConfigError`] naming the first zero field, or
    /// [`ConfigError::PeriodLengthOverflow`] if `hours_per_period` seconds
    /// do not fit in a `u64`.
    pub fn new(
        hours_per_period: u64,
        mining_coefficient: u64,
        locked_periods_coefficient: u64,
        awarded_periods: u64,
    ) -> Result<Self, ConfigError> {
        if hours_per_period == 0 {
            return Err(ConfigError::ZeroHoursPerPeriod);
        }
        if mining_coefficient == 0 {
            return Err(ConfigError::ZeroMiningCoefficient);
        }
        if locked_periods_coefficient == 0 {
            return Err(ConfigError::ZeroLockedPeriodsCoefficient);
        }
        if awarded_periods == 0 {
            return Err(ConfigError::ZeroAwardedPeriods);
        }
        let seconds_per_period = hours_per_period
            .checked_mul(SECONDS_PER_HOUR)
            .ok_or(ConfigError::PeriodLengthOverflow {
                hours: hours_per_period,
            })?;

        Ok(Self {
            hours_per_period,
            seconds_per_period,
            mining_coefficient,
            locked_periods_coefficient,
            awarded_periods,
        })
    }

    pub fn hours_per_period(&self) -> u64 {
        self.hours_per_period
    }

    /// Period length in seconds (`hours_per_period * 3600`).
    pub fn seconds_per_period(&self) -> u64 {
        self.seconds_per_period
    }

    /// k2: divisor controlling overall reward magnitude.
    pub fn mining_coefficient(&self) -> u64 {
        self.mining_coefficient
    }

    /// k1: additive duration bonus baseline.
    pub fn locked_periods_coefficient(&self) -> u64 {
        self.locked_periods_coefficient
    }

    /// Cap on the number of locked periods counted toward the bonus.
    pub fn awarded_periods(&self) -> u64 {
        self.awarded_periods
    }

    /// `min(all_locked_periods, awarded_periods) + k1`.
    ///
    /// Returns `None` if the sum overflows.
    pub fn effective_periods(&self, all_locked_periods: u64) -> Option<u64> {
        all_locked_periods
            .min(self.awarded_periods)
            .checked_add(self.locked_periods_coefficient)
    }
}

impl Default for IssuanceParameters {
    fn default() -> Self {
        Self {
            hours_per_period: DEFAULT_HOURS_PER_PERIOD,
            seconds_per_period: DEFAULT_HOURS_PER_PERIOD * SECONDS_PER_HOUR,
            mining_coefficient: DEFAULT_MINING_COEFFICIENT,
            locked_periods_coefficient: DEFAULT_LOCKED_PERIODS_COEFFICIENT,
            awarded_periods: DEFAULT_AWARDED_PERIODS,
        }
    }
}
