//! Portfolio Bounded Context
//!
//! Read-only view of the holdings owned by the portfolio collaborator.
//! The decision core never mutates these; all changes go through orders.

pub mod value_objects;

pub use value_objects::{Holding, PortfolioSnapshot, PositionRole};
