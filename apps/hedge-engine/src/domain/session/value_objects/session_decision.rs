//! Decisions produced by the session controller.

use serde::{Deserialize, Serialize};

use super::SessionPhase;
use crate::domain::portfolio::PositionRole;
use crate::domain::shared::Symbol;

/// Why the overlay is being unwound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnwindReason {
    /// Hedge entered the roll window.
    RollWindow {
        /// Calendar days left on the hedge.
        days_remaining: i64,
    },
    /// Hedge contracts are held but no expiration is tracked.
    UntrackedHedge,
}

/// One position to liquidate, with its human-readable tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquidation {
    /// Instrument to liquidate.
    pub symbol: Symbol,
    /// Role of the holding.
    pub role: PositionRole,
    /// Quantity held at decision time.
    pub quantity: i64,
    /// Order tag.
    pub tag: String,
}

/// What to do this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionDecision {
    /// Size the underlying and buy the hedge.
    Enter,
    /// Keep both positions.
    Hold {
        /// Calendar days left on the hedge.
        days_remaining: i64,
    },
    /// Liquidate every open position and return to flat.
    Unwind {
        /// Trigger.
        reason: UnwindReason,
        /// Per-position liquidations.
        liquidations: Vec<Liquidation>,
    },
}

impl SessionDecision {
    /// Phase the overlay moves into when this decision is acted on.
    #[must_use]
    pub const fn target_phase(&self) -> SessionPhase {
        match self {
            Self::Enter | Self::Hold { .. } => SessionPhase::FullyHedged,
            Self::Unwind { .. } => SessionPhase::Unwinding,
        }
    }
}
