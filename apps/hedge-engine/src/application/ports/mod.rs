//! Application Ports (Driven)
//!
//! Interfaces for the external trading platform. The decision core treats
//! every call as instantaneous and either succeeding or failing.

mod broker_port;
mod market_data_port;
mod portfolio_port;
mod session_clock_port;

pub use broker_port::{
    BrokerError, BrokerPort, LiquidationTarget, OrderAck, OrderSide, SubmitOrderRequest,
};
pub use market_data_port::{MarketDataError, MarketDataPort};
pub use portfolio_port::{PortfolioError, PortfolioPort};
pub use session_clock_port::{SessionClockPort, SessionContext};
