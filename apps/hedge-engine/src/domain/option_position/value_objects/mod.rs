//! Option Position Value Objects

mod hedge_position;
mod option_contract;

pub use hedge_position::HedgePosition;
pub use option_contract::{DEFAULT_MULTIPLIER, OptionContract, OptionRight, occ_symbol};
