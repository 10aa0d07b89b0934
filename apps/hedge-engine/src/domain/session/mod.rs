//! Session Bounded Context
//!
//! The daily enter / hold / unwind state machine. The only state carried
//! between sessions is the tracked hedge expiration in [`SessionState`].

pub mod services;
pub mod value_objects;

pub use services::SessionController;
pub use value_objects::{Liquidation, SessionDecision, SessionPhase, SessionState, UnwindReason};
