//! Option Position Bounded Context
//!
//! Option contract snapshots supplied by the chain collaborator and the
//! derived view of the single open hedge.

pub mod value_objects;

pub use value_objects::{
    DEFAULT_MULTIPLIER, HedgePosition, OptionContract, OptionRight, occ_symbol,
};
