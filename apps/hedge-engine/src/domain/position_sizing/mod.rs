//! Position Sizing Bounded Context
//!
//! Converts available cash into a whole number of underlying lots so that
//! every lot can later receive exactly one covering hedge contract.

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::SizingError;
pub use services::{PositionSizer, SizingInput, SizingResult};
pub use value_objects::SizingParameters;
