//! Position sizing for the underlying leg.
//!
//! Sizes the underlying holding to whole lots:
//! - usable cash = available cash - estimated fee
//! - affordable units = floor(usable cash / spot)
//! - quantity = floor(affordable units / lot size) x lot size
//!
//! # Example
//!
//! ```rust,ignore
//! use hedge_engine::domain::position_sizing::{PositionSizer, SizingInput, SizingParameters};
//! use rust_decimal_macros::dec;
//!
//! let sizer = PositionSizer::new(&SizingParameters::default());
//! let result = sizer.compute_target_underlying_quantity(&SizingInput {
//!     available_cash: dec!(100000),
//!     spot_price: dec!(400),
//!     total_portfolio_value: dec!(100000),
//! })?;
//! assert_eq!(result.quantity, 200);
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::position_sizing::{SizingError, SizingParameters};

/// Input parameters for position sizing calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingInput {
    /// Cash available for new positions.
    pub available_cash: Decimal,
    /// Current price of the underlying.
    pub spot_price: Decimal,
    /// Total portfolio value, used for the target allocation fraction.
    pub total_portfolio_value: Decimal,
}

/// Result of position sizing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Units of underlying to hold (a whole number of lots).
    pub quantity: i64,
    /// Number of lots represented by `quantity`.
    pub lots: i64,
    /// `quantity x spot`.
    pub total_cost: Decimal,
    /// Cash left after the estimated fee.
    pub usable_cash: Decimal,
    /// `total_cost / total_portfolio_value` for the execution collaborator.
    pub target_allocation: Decimal,
}

/// Position sizer rounding down to whole lots.
#[derive(Debug, Clone)]
pub struct PositionSizer {
    lot_size: u32,
    estimated_fee: Decimal,
}

impl PositionSizer {
    /// Create a sizer from the configured parameters.
    #[must_use]
    pub const fn new(params: &SizingParameters) -> Self {
        Self {
            lot_size: params.lot_size,
            estimated_fee: params.estimated_fee,
        }
    }

    /// Compute the underlying quantity to hold.
    ///
    /// # Errors
    ///
    /// Returns [`SizingError::InvalidPrice`] for a non-positive spot and
    /// [`SizingError::Shortfall`] when not even one lot is affordable.
    pub fn compute_target_underlying_quantity(
        &self,
        input: &SizingInput,
    ) -> Result<SizingResult, SizingError> {
        if input.spot_price <= Decimal::ZERO {
            return Err(SizingError::InvalidPrice {
                price: input.spot_price,
            });
        }

        let lot = i64::from(self.lot_size.max(1));
        let usable_cash = input.available_cash - self.estimated_fee;
        let shortfall = || SizingError::Shortfall {
            usable_cash,
            lot_cost: input.spot_price * Decimal::from(lot),
        };

        if usable_cash <= Decimal::ZERO {
            return Err(shortfall());
        }

        let affordable_units = (usable_cash / input.spot_price)
            .floor()
            .to_i64()
            .unwrap_or(0);
        let lots = affordable_units / lot;
        let quantity = lots * lot;
        let total_cost = Decimal::from(quantity) * input.spot_price;

        if quantity <= 0 || total_cost > usable_cash {
            return Err(shortfall());
        }

        let target_allocation = if input.total_portfolio_value > Decimal::ZERO {
            total_cost / input.total_portfolio_value
        } else {
            Decimal::ZERO
        };

        Ok(SizingResult {
            quantity,
            lots,
            total_cost,
            usable_cash,
            target_allocation,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
