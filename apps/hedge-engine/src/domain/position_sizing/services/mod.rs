//! Position Sizing Services

mod position_sizer;

pub use position_sizer::{PositionSizer, SizingInput, SizingResult};
