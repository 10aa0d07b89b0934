//! Position Sizing Value Objects

mod sizing_parameters;

pub use sizing_parameters::SizingParameters;
