//! Paper trading platform.
//!
//! Fills every market order instantly at the current mark, charging a flat
//! fee per order. Market data comes from a JSON snapshot or from setters.

mod platform;
mod snapshot;

pub use platform::{PaperError, PaperPlatform};
pub use snapshot::{ContractQuote, MarketSnapshot};
