//! Portfolio Port (Driven Port)
//!
//! Read access to the broker-side portfolio accounting.

use async_trait::async_trait;

use crate::domain::portfolio::PortfolioSnapshot;

/// Portfolio port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortfolioError {
    /// Portfolio state could not be read.
    #[error("Portfolio unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for reading the current portfolio.
#[async_trait]
pub trait PortfolioPort: Send + Sync {
    /// Current holdings, available cash and total value.
    async fn snapshot(&self) -> Result<PortfolioSnapshot, PortfolioError>;
}
