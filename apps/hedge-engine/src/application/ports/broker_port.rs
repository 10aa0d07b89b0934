//! Broker Port (Driven Port)
//!
//! Interface for submitting orders and liquidations to the platform.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::portfolio::PositionRole;
use crate::domain::shared::Symbol;

/// Order side, derived from the sign of the quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Buy.
    Buy,
    /// Sell.
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Request to submit a market order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    /// Client order ID.
    pub client_order_id: String,
    /// Instrument to trade.
    pub symbol: Symbol,
    /// Role recorded on the resulting holding.
    pub role: PositionRole,
    /// Signed quantity (positive buys, negative sells).
    pub quantity: i64,
    /// Human-readable order tag.
    pub tag: String,
    /// Target allocation fraction of total portfolio value, if sized that way.
    pub target_allocation: Option<Decimal>,
}

impl SubmitOrderRequest {
    /// Order for the underlying leg.
    #[must_use]
    pub fn underlying(symbol: Symbol, quantity: i64, tag: impl Into<String>) -> Self {
        Self::new(symbol, PositionRole::Underlying, quantity, tag)
    }

    /// Order for the hedge leg.
    #[must_use]
    pub fn hedge(symbol: Symbol, quantity: i64, tag: impl Into<String>) -> Self {
        Self::new(symbol, PositionRole::Hedge, quantity, tag)
    }

    fn new(symbol: Symbol, role: PositionRole, quantity: i64, tag: impl Into<String>) -> Self {
        Self {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            symbol,
            role,
            quantity,
            tag: tag.into(),
            target_allocation: None,
        }
    }

    /// Attach the sizer's target allocation fraction.
    #[must_use]
    pub const fn with_target_allocation(mut self, allocation: Decimal) -> Self {
        self.target_allocation = Some(allocation);
        self
    }

    /// Side implied by the quantity sign.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        if self.quantity >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }
}

/// What to liquidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "symbol", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidationTarget {
    /// Every open position.
    All,
    /// A single instrument.
    Instrument(Symbol),
}

/// Acknowledgment after an order is filled or accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Client order ID echoed back.
    pub client_order_id: String,
    /// Broker-assigned order ID.
    pub broker_order_id: String,
    /// Instrument traded.
    pub symbol: Symbol,
    /// Signed filled quantity.
    pub filled_quantity: i64,
    /// Average fill price per unit, if filled.
    pub fill_price: Option<Decimal>,
    /// Order tag.
    pub tag: String,
}

/// Broker port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BrokerError {
    /// Connection error.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// Order rejected by broker.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Insufficient funds.
    #[error("Insufficient buying power: required {required}, available {available}")]
    InsufficientFunds {
        /// Cash needed for the order.
        required: Decimal,
        /// Cash available.
        available: Decimal,
    },
}

/// Port for order submission.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Submit a market order.
    async fn submit_order(&self, request: SubmitOrderRequest) -> Result<OrderAck, BrokerError>;

    /// Close positions, returning one acknowledgment per closed position.
    async fn liquidate(
        &self,
        target: LiquidationTarget,
        tag: &str,
    ) -> Result<Vec<OrderAck>, BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn underlying_order_request() {
        let request = SubmitOrderRequest::underlying(Symbol::new("QQQ"), 200, "Bought 200 QQQ shares.")
            .with_target_allocation(dec!(0.8));

        assert_eq!(request.role, PositionRole::Underlying);
        assert_eq!(request.side(), OrderSide::Buy);
        assert_eq!(request.target_allocation, Some(dec!(0.8)));
        assert!(!request.client_order_id.is_empty());
    }

    #[test]
    fn negative_quantity_sells() {
        let request = SubmitOrderRequest::hedge(Symbol::new("QQQ240517P00395000"), -3, "close");
        assert_eq!(request.role, PositionRole::Hedge);
        assert_eq!(request.side(), OrderSide::Sell);
    }

    #[test]
    fn client_order_ids_are_unique() {
        let a = SubmitOrderRequest::underlying(Symbol::new("QQQ"), 1, "a");
        let b = SubmitOrderRequest::underlying(Symbol::new("QQQ"), 1, "b");
        assert_ne!(a.client_order_id, b.client_order_id);
    }

    #[test]
    fn liquidation_target_serde() {
        let json = serde_json::to_string(&LiquidationTarget::Instrument(Symbol::new("QQQ"))).unwrap();
        assert_eq!(json, r#"{"scope":"INSTRUMENT","symbol":"QQQ"}"#);
        let all = serde_json::to_string(&LiquidationTarget::All).unwrap();
        assert_eq!(all, r#"{"scope":"ALL"}"#);
    }

    #[test]
    fn broker_error_display() {
        let err = BrokerError::InsufficientFunds {
            required: dec!(2820),
            available: dec!(100),
        };
        assert!(err.to_string().contains("2820"));
    }
}
