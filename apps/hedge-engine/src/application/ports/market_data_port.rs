//! Market Data Port (Driven Port)
//!
//! Spot prices and option chains for the current evaluation moment.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::option_position::OptionContract;
use crate::domain::shared::Symbol;

/// Market data port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketDataError {
    /// No snapshot for the instrument this cycle.
    #[error("No market data for {symbol}")]
    Unavailable {
        /// Requested instrument.
        symbol: Symbol,
    },

    /// Connection error.
    #[error("Market data connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },
}

/// Port for market data lookups.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Current price of an instrument.
    async fn price_of(&self, symbol: &Symbol) -> Result<Decimal, MarketDataError>;

    /// Option chain for `underlying` as of `as_of`.
    async fn chain_for(
        &self,
        underlying: &Symbol,
        as_of: NaiveDate,
    ) -> Result<Vec<OptionContract>, MarketDataError>;
}
