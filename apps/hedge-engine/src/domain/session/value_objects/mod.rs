//! Session Value Objects

mod session_decision;
mod session_state;

pub use session_decision::{Liquidation, SessionDecision, UnwindReason};
pub use session_state::{SessionPhase, SessionState};
