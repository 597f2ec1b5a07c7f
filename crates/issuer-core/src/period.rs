//! Period clock: seconds since the Unix epoch bucketed into fixed-length periods.

use crate::error::ConfigError;

/// `floor(now_secs / seconds_per_period)`.
///
/// # Examples
///
/// ```
/// use issuer_core::period::current_period;
/// assert_eq!(current_period(86_399, 86_400).unwrap(), 0);
/// assert_eq!(current_period(86_400, 86_400).unwrap(), 1);
/// ```
pub fn current_period(now_secs: u64, seconds_per_period: u64) -> Result<u64, ConfigError> {
    now_secs
        .checked_div(seconds_per_period)
        .ok_or(ConfigError::ZeroSecondsPerPeriod)
}

/// First second of `period`. Saturates at `u64::MAX`.
pub fn period_start(period: u64, seconds_per_period: u64) -> u64 {
    period.saturating_mul(seconds_per_period)
}

/// Wall-clock seconds since the Unix epoch. Clamped to zero before 1970.
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
