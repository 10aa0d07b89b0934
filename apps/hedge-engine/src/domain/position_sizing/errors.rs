//! Position sizing errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error during position sizing calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// Spot price was zero or negative.
    #[error("Invalid spot price: {price}")]
    InvalidPrice {
        /// The rejected price.
        price: Decimal,
    },

    /// Not enough cash to buy even one full lot.
    #[error("Insufficient cash for one lot: usable {usable_cash}, lot cost {lot_cost}")]
    Shortfall {
        /// Cash left after the estimated fee.
        usable_cash: Decimal,
        /// Cost of a single lot at the spot price.
        lot_cost: Decimal,
    },
}
