//! Infrastructure Layer
//!
//! Adapters implementing the application ports:
//!
//! - `paper/`: In-process paper trading platform (market data, portfolio,
//!   broker and calendar in one)
//! - `clock`: Wall-clock session calendar for scheduled runs

pub mod clock;
pub mod paper;

pub use clock::SystemSessionClock;
pub use paper::{MarketSnapshot, PaperError, PaperPlatform};
