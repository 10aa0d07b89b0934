//! Holding value object.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::Symbol;

/// Role of a holding within the overlay, tagged when the order is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionRole {
    /// Long underlying shares.
    Underlying,
    /// Protective option contracts.
    Hedge,
}

impl fmt::Display for PositionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underlying => write!(f, "UNDERLYING"),
            Self::Hedge => write!(f, "HEDGE"),
        }
    }
}

/// A position reported by the portfolio collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Instrument identity.
    pub symbol: Symbol,
    /// Role assigned at order submission.
    pub role: PositionRole,
    /// Signed quantity (positive = long). Contracts for hedges.
    pub quantity: i64,
    /// Average entry price per unit.
    pub average_price: Decimal,
    /// Current mark per unit.
    pub market_price: Decimal,
    /// Unrealized profit or loss in percent of cost.
    pub unrealized_pnl_pct: Decimal,
}

impl Holding {
    /// Create a holding with no open profit or loss.
    #[must_use]
    pub fn new(symbol: Symbol, role: PositionRole, quantity: i64, price: Decimal) -> Self {
        Self {
            symbol,
            role,
            quantity,
            average_price: price,
            market_price: price,
            unrealized_pnl_pct: Decimal::ZERO,
        }
    }

    /// Set the unrealized profit or loss percentage.
    #[must_use]
    pub const fn with_unrealized_pnl_pct(mut self, pct: Decimal) -> Self {
        self.unrealized_pnl_pct = pct;
        self
    }

    /// Whether the holding has a non-zero quantity.
    #[must_use]
    pub const fn is_invested(&self) -> bool {
        self.quantity != 0
    }

    /// Whether the holding is a hedge contract.
    #[must_use]
    pub fn is_hedge(&self) -> bool {
        self.role == PositionRole::Hedge
    }
}
