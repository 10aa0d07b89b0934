//! Hedge Selection Services

mod contract_selector;
mod hedge_sizing;

pub use contract_selector::{ContractSelector, HedgeTarget};
pub use hedge_sizing::{Affordability, compute_hedge_quantity, evaluate_affordability};
