//! Process-wide sizing and horizon parameters.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::OptionRight;
use crate::domain::shared::DomainError;

/// Parameters fixed at initialization and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingParameters {
    /// Units of underlying covered by one hedge contract.
    pub lot_size: u32,
    /// Target days-to-expiration at hedge entry.
    pub initial_horizon_days: u32,
    /// Fraction of the initial horizon remaining at which to roll.
    pub exit_horizon_fraction: Decimal,
    /// Target hedge delta (negative for puts).
    pub target_delta: Decimal,
    /// Estimated fee reserved per transaction.
    pub estimated_fee: Decimal,
    /// Hedge option right.
    pub hedge_right: OptionRight,
}

impl Default for SizingParameters {
    fn default() -> Self {
        Self {
            lot_size: 100,
            initial_horizon_days: 60,
            exit_horizon_fraction: Decimal::new(5, 1),
            target_delta: Decimal::new(-50, 2),
            estimated_fee: Decimal::ONE,
            hedge_right: OptionRight::Put,
        }
    }
}

impl SizingParameters {
    /// Days-remaining threshold at or below which the hedge is rolled.
    ///
    /// `initial_horizon_days * exit_horizon_fraction`, floored to whole days.
    #[must_use]
    pub fn exit_threshold_days(&self) -> i64 {
        (Decimal::from(self.initial_horizon_days) * self.exit_horizon_fraction)
            .floor()
            .to_i64()
            .unwrap_or(0)
    }

    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.lot_size == 0 {
            return Err(DomainError::invalid("lot_size", "must be positive"));
        }
        if self.initial_horizon_days == 0 {
            return Err(DomainError::invalid(
                "initial_horizon_days",
                "must be positive",
            ));
        }
        if self.exit_horizon_fraction <= Decimal::ZERO || self.exit_horizon_fraction > Decimal::ONE
        {
            return Err(DomainError::invalid(
                "exit_horizon_fraction",
                "must be within (0, 1]",
            ));
        }
        if self.target_delta < Decimal::NEGATIVE_ONE || self.target_delta > Decimal::ONE {
            return Err(DomainError::invalid("target_delta", "must be within [-1, 1]"));
        }
        let sign_matches = match self.hedge_right {
            OptionRight::Put => self.target_delta <= Decimal::ZERO,
            OptionRight::Call => self.target_delta >= Decimal::ZERO,
        };
        if !sign_matches {
            return Err(DomainError::invalid(
                "target_delta",
                format!("sign does not match hedge right {}", self.hedge_right),
            ));
        }
        if self.estimated_fee < Decimal::ZERO {
            return Err(DomainError::invalid("estimated_fee", "cannot be negative"));
        }
        Ok(())
    }
}
