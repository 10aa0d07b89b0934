//! Crate-level error taxonomy for one evaluation cycle.
//!
//! Every failure the daily cycle can hit folds into one of four kinds:
//!
//! | Kind | Handling |
//! |------|----------|
//! | `DataUnavailable` | Skip the cycle silently, no orders |
//! | `Shortfall` | Warn, liquidate any partial position, stay flat |
//! | `NotFound` | Warn, liquidate any partial position, stay flat |
//! | `OrderRejected` | Warn, liquidate any partial position, stay flat |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{BrokerError, MarketDataError, PortfolioError};
use crate::domain::hedge_selection::SelectionError;
use crate::domain::position_sizing::SizingError;
use crate::domain::shared::DomainError;

/// Stable code for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Snapshot missing for this moment.
    DataUnavailable,
    /// Cash insufficient for a lot, the hedge premium, or held shares too few.
    Shortfall,
    /// No hedge contract matched.
    NotFound,
    /// An order or liquidation was refused.
    OrderRejected,
}

impl ErrorCode {
    /// Code as a log-friendly string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DataUnavailable => "DATA_UNAVAILABLE",
            Self::Shortfall => "SHORTFALL",
            Self::NotFound => "NOT_FOUND",
            Self::OrderRejected => "ORDER_REJECTED",
        }
    }
}

/// Failure of one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HedgeError {
    /// Required market or portfolio data is missing.
    #[error("{0}")]
    DataUnavailable(String),

    /// Not enough cash or shares to build the full position.
    #[error("{0}")]
    Shortfall(String),

    /// No hedge contract could be selected.
    #[error("{0}")]
    NotFound(String),

    /// The platform refused an order.
    #[error("{0}")]
    OrderRejected(String),
}

impl HedgeError {
    /// Code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DataUnavailable(_) => ErrorCode::DataUnavailable,
            Self::Shortfall(_) => ErrorCode::Shortfall,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::OrderRejected(_) => ErrorCode::OrderRejected,
        }
    }

    /// Whether the cycle resolves this by liquidating to flat.
    ///
    /// Missing data only skips the cycle.
    #[must_use]
    pub const fn is_recoverable_by_liquidation(&self) -> bool {
        !matches!(self, Self::DataUnavailable(_))
    }
}

impl From<SizingError> for HedgeError {
    fn from(err: SizingError) -> Self {
        match err {
            SizingError::InvalidPrice { .. } => Self::DataUnavailable(err.to_string()),
            SizingError::Shortfall { .. } => Self::Shortfall(err.to_string()),
        }
    }
}

impl From<SelectionError> for HedgeError {
    fn from(err: SelectionError) -> Self {
        Self::NotFound(err.to_string())
    }
}

impl From<MarketDataError> for HedgeError {
    fn from(err: MarketDataError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

impl From<PortfolioError> for HedgeError {
    fn from(err: PortfolioError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

impl From<BrokerError> for HedgeError {
    fn from(err: BrokerError) -> Self {
        Self::OrderRejected(err.to_string())
    }
}

impl From<DomainError> for HedgeError {
    fn from(err: DomainError) -> Self {
        Self::OrderRejected(err.to_string())
    }
}
