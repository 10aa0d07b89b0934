//! Portfolio Value Objects

mod holding;
mod portfolio_snapshot;

pub use holding::{Holding, PositionRole};
pub use portfolio_snapshot::PortfolioSnapshot;
