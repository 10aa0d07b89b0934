//! Hedge Selection Bounded Context
//!
//! Picks the option contract closest to a target delta and horizon, sizes
//! the hedge to the held lots, and checks that the premium is affordable.

pub mod errors;
pub mod services;

pub use errors::SelectionError;
pub use services::{
    Affordability, ContractSelector, HedgeTarget, compute_hedge_quantity, evaluate_affordability,
};
