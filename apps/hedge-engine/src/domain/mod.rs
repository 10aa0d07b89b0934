//! Domain Layer
//!
//! The decision core, with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`position_sizing`]: Whole-lot sizing of the underlying
//! - [`hedge_selection`]: Delta/horizon contract selection and hedge sizing
//! - [`session`]: Daily enter / hold / unwind state machine
//! - [`option_position`]: Option contract snapshots and the open hedge
//! - [`portfolio`]: Read-only holdings view

pub mod hedge_selection;
pub mod option_position;
pub mod portfolio;
pub mod position_sizing;
pub mod session;
pub mod shared;
