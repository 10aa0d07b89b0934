//! Hedge quantity and affordability.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::option_position::OptionContract;

/// Contracts needed to cover `held_quantity` units of underlying.
///
/// `floor(held / lot) + 1`, so a partial lot is never left uncovered.
/// Returns 0 when nothing is held (the caller must not hedge).
#[must_use]
pub fn compute_hedge_quantity(held_quantity: i64, lot_size: u32) -> i64 {
    if held_quantity <= 0 || lot_size == 0 {
        return 0;
    }
    held_quantity / i64::from(lot_size) + 1
}

/// Outcome of the premium cash check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affordability {
    /// Cash covers the full premium.
    Affordable {
        /// Premium for the whole hedge.
        cost: Decimal,
    },
    /// Cash does not cover the full premium; no partial hedge is taken.
    Insufficient {
        /// Premium for the whole hedge.
        cost: Decimal,
        /// Cash that was available.
        available: Decimal,
    },
}

impl Affordability {
    /// Whether the hedge can be bought.
    #[must_use]
    pub const fn is_affordable(&self) -> bool {
        matches!(self, Self::Affordable { .. })
    }
}

/// Check whether `quantity` contracts can be bought at the ask.
#[must_use]
pub fn evaluate_affordability(
    contract: &OptionContract,
    quantity: i64,
    available_cash: Decimal,
) -> Affordability {
    let cost = contract.premium(quantity);
    if available_cash >= cost {
        Affordability::Affordable { cost }
    } else {
        Affordability::Insufficient {
            cost,
            available: available_cash,
        }
    }
}
