//! Issuance ledger: the dual-buffer supply tracker and the mint formula.
//!
//! The ledger keeps two snapshots of the issued supply. A mint for a period
//! later than the last minted one reads the newer snapshot and writes a new
//! one into the older slot; a mint for an already passed period reads the
//! older snapshot and adds to the newer one. The relative magnitude of the
//! two buffers is the only record of which one is newer.
//!
//! All arithmetic is integer-only. The share formula is evaluated with
//! arbitrary-precision intermediates and floors twice before subtracting:
//!
//! ```text
//! amount = floor(T * L * E / D) - floor(C * L * E / D)
//! D      = total_locked_value * mining_coefficient
//! E      = min(all_locked_periods, awarded_periods) + locked_periods_coefficient
//! ```
//!
//! Every operation computes the complete next state before committing it, so
//! a failed call leaves the ledger untouched.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use tracing::{debug, info};

use crate::error::IssuanceError;
use crate::params::IssuanceParameters;
use crate::traits::TokenLedger;
use crate::types::{Address, Initialized, LedgerState, MintBranch, MintOutcome, SupplyBuffer};

/// Proportional-share award, floored twice, with the one-unit minimum.
///
/// Does not check saturation; see [`quote`] for the full read-side rule.
///
/// # Errors
///
/// - [`IssuanceError::DivisionByZero`] if `total_locked_value` or
///   `mining_coefficient` is zero
/// - [`IssuanceError::ArithmeticUnderflow`] if `current_supply` exceeds
///   `total_supply` by enough to make the difference negative
/// - [`IssuanceError::ArithmeticOverflow`] if the award does not fit in `u128`
///
/// # Examples
///
/// ```
/// use issuer_core::ledger::mint_amount;
/// // (1_000_000 - 900_000) * 1_000 / 10_000 * 6 / 100 = 600
/// assert_eq!(mint_amount(1_000_000, 900_000, 1_000, 10_000, 6, 100).unwrap(), 600);
/// // Dust shares still earn one unit.
/// assert_eq!(mint_amount(1_000_000, 999_999, 1, 10_000, 1, 100).unwrap(), 1);
/// ```
pub fn mint_amount(
    total_supply: u128,
    current_supply: u128,
    locked_value: u128,
    total_locked_value: u128,
    effective_periods: u64,
    mining_coefficient: u64,
) -> Result<u128, IssuanceError> {
    let denominator = BigUint::from(total_locked_value) * BigUint::from(mining_coefficient);
    if denominator.is_zero() {
        return Err(IssuanceError::DivisionByZero);
    }

    let scale = BigUint::from(locked_value) * BigUint::from(effective_periods);
    let cap_share = BigUint::from(total_supply) * &scale / &denominator;
    let issued_share = BigUint::from(current_supply) * &scale / &denominator;
    if cap_share < issued_share {
        return Err(IssuanceError::ArithmeticUnderflow);
    }

    let amount = (cap_share - issued_share)
        .to_u128()
        .ok_or(IssuanceError::ArithmeticOverflow)?;

    Ok(amount.max(1))
}

/// Award for a participant given the supply snapshot the mint reads.
///
/// Returns 0 when `current_supply` has reached `total_supply` (saturation),
/// otherwise applies the duration bonus from `params` and evaluates
/// [`mint_amount`].
pub fn quote(
    params: &IssuanceParameters,
    total_supply: u128,
    current_supply: u128,
    locked_value: u128,
    total_locked_value: u128,
    all_locked_periods: u64,
) -> Result<u128, IssuanceError> {
    if current_supply >= total_supply {
        return Ok(0);
    }
    let effective_periods = params
        .effective_periods(all_locked_periods)
        .ok_or(IssuanceError::ArithmeticOverflow)?;

    mint_amount(
        total_supply,
        current_supply,
        locked_value,
        total_locked_value,
        effective_periods,
        params.mining_coefficient(),
    )
}

/// Token-issuance accounting state plus its fixed parameters.
///
/// Not thread-safe; wrap in [`SharedLedger`](crate::shared::SharedLedger)
/// for serialized access from multiple threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceLedger {
    pub(crate) params: IssuanceParameters,
    pub(crate) state: LedgerState,
}

impl IssuanceLedger {
    /// A ledger with zeroed state, awaiting [`initialize`](Self::initialize).
    pub fn new(params: IssuanceParameters) -> Self {
        Self {
            params,
            state: LedgerState::default(),
        }
    }

    pub fn params(&self) -> &IssuanceParameters {
        &self.params
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Both buffers have reached the total supply: no read can mint again.
    pub fn is_saturated(&self) -> bool {
        self.is_initialized() && self.state.oldest_supply() >= self.state.total_supply
    }

    /// Period containing `now_secs`.
    pub fn current_period(&self, now_secs: u64) -> u64 {
        // Parameters guarantee a non-zero period length.
        now_secs / self.params.seconds_per_period()
    }

    /// Tokens not yet issued as of the newest supply snapshot.
    ///
    /// Zero before initialization.
    pub fn reserved_reward(&self) -> u128 {
        self.state
            .total_supply
            .saturating_sub(self.state.newest_supply())
    }

    /// Capture the supply cap and set both buffers to the issued supply.
    ///
    /// `external_total_supply` is the token ledger's current total and
    /// `reserved_reward` the portion held back for future minting.
    /// `last_minted_period` becomes the period containing `now_secs`.
    ///
    /// # Errors
    ///
    /// - [`IssuanceError::AlreadyInitialized`] if either buffer is non-zero
    /// - [`IssuanceError::ArithmeticUnderflow`] if `reserved_reward > external_total_supply`
    /// - [`IssuanceError::EmptyCirculatingSupply`] if nothing would be counted as issued
    pub fn initialize(
        &mut self,
        reserved_reward: u128,
        external_total_supply: u128,
        now_secs: u64,
    ) -> Result<Initialized, IssuanceError> {
        if self.state.current_supply_a != 0 || self.state.current_supply_b != 0 {
            return Err(IssuanceError::AlreadyInitialized);
        }
        let current_total_supply = external_total_supply
            .checked_sub(reserved_reward)
            .ok_or(IssuanceError::ArithmeticUnderflow)?;
        if current_total_supply == 0 {
            return Err(IssuanceError::EmptyCirculatingSupply);
        }

        let period = self.current_period(now_secs);
        self.state = LedgerState {
            total_supply: external_total_supply,
            current_supply_a: current_total_supply,
            current_supply_b: current_total_supply,
            last_minted_period: period,
        };

        info!(
            reserved_reward = %reserved_reward,
            total_supply = %external_total_supply,
            period,
            "issuer: ledger initialized"
        );

        Ok(Initialized {
            reserved_reward,
            total_supply: external_total_supply,
            period,
        })
    }

    /// Initialize from the token ledger: the cap is its total supply and the
    /// reserve is the balance held by `issuer`.
    pub fn initialize_from_token(
        &mut self,
        token: &dyn TokenLedger,
        issuer: &Address,
        now_secs: u64,
    ) -> Result<Initialized, IssuanceError> {
        let reserved_reward = token.balance_of(issuer);
        let total_supply = token.total_supply();
        debug!(%issuer, reserved_reward = %reserved_reward, "issuer: read reserve from token ledger");
        self.initialize(reserved_reward, total_supply, now_secs)
    }

    /// Compute and record the award for one participant in `period`.
    ///
    /// Returns 0 without touching state when the supply snapshot read for
    /// this period is saturated.
    pub fn mint(
        &mut self,
        period: u64,
        locked_value: u128,
        total_locked_value: u128,
        all_locked_periods: u64,
    ) -> Result<u128, IssuanceError> {
        self.mint_detailed(period, locked_value, total_locked_value, all_locked_periods)
            .map(|outcome| outcome.amount)
    }

    /// [`mint`](Self::mint), reporting which branch ran and which buffer was written.
    ///
    /// # Errors
    ///
    /// - [`IssuanceError::NotInitialized`] before [`initialize`](Self::initialize)
    /// - [`IssuanceError::DivisionByZero`] if `total_locked_value` is zero
    /// - [`IssuanceError::ArithmeticOverflow`] / [`IssuanceError::ArithmeticUnderflow`]
    ///   from the formula or the buffer update
    pub fn mint_detailed(
        &mut self,
        period: u64,
        locked_value: u128,
        total_locked_value: u128,
        all_locked_periods: u64,
    ) -> Result<MintOutcome, IssuanceError> {
        if !self.state.is_initialized() {
            return Err(IssuanceError::NotInitialized);
        }

        let backfill = period <= self.state.last_minted_period;
        let current_supply = if backfill {
            self.state.oldest_supply()
        } else {
            self.state.newest_supply()
        };

        // Backfills can carry the newer buffer past the cap; reading it then
        // counts as saturated, keeping the older buffer within the cap.
        if current_supply >= self.state.total_supply {
            debug!(period, backfill, "issuer: supply saturated, nothing to mint");
            return Ok(MintOutcome {
                period,
                amount: 0,
                branch: MintBranch::Saturated,
                buffer: None,
            });
        }

        let amount = quote(
            &self.params,
            self.state.total_supply,
            current_supply,
            locked_value,
            total_locked_value,
            all_locked_periods,
        )?;

        let mut next = self.state;
        let a_is_newer = next.current_supply_a > next.current_supply_b;
        let (branch, buffer) = if backfill {
            if a_is_newer {
                next.current_supply_a = add_amount(next.current_supply_a, amount)?;
                (MintBranch::Backfill, SupplyBuffer::A)
            } else {
                next.current_supply_b = add_amount(next.current_supply_b, amount)?;
                (MintBranch::Backfill, SupplyBuffer::B)
            }
        } else {
            next.last_minted_period = period;
            if a_is_newer {
                next.current_supply_b = add_amount(next.current_supply_a, amount)?;
                (MintBranch::Forward, SupplyBuffer::B)
            } else {
                next.current_supply_a = add_amount(next.current_supply_b, amount)?;
                (MintBranch::Forward, SupplyBuffer::A)
            }
        };
        self.state = next;

        debug!(
            period,
            ?branch,
            ?buffer,
            amount = %amount,
            current_supply = %current_supply,
            "issuer: minted"
        );

        Ok(MintOutcome {
            period,
            amount,
            branch,
            buffer: Some(buffer),
        })
    }
}

fn add_amount(supply: u128, amount: u128) -> Result<u128, IssuanceError> {
    supply
        .checked_add(amount)
        .ok_or(IssuanceError::ArithmeticOverflow)
}
