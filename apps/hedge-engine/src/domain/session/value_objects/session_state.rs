//! Session state carried between daily evaluations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::portfolio::PortfolioSnapshot;

/// Lifecycle phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// No underlying and no hedge.
    Flat,
    /// Underlying and hedge both open.
    FullyHedged,
    /// Roll trigger fired; liquidation in progress this cycle.
    Unwinding,
}

impl SessionPhase {
    /// Phase implied by the current holdings.
    ///
    /// `Unwinding` is never observed from holdings; it only exists inside
    /// the cycle that liquidates.
    #[must_use]
    pub fn observe(portfolio: &PortfolioSnapshot) -> Self {
        if portfolio.is_invested() && portfolio.hedge_contracts() > 0 {
            Self::FullyHedged
        } else {
            Self::Flat
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "FLAT"),
            Self::FullyHedged => write!(f, "FULLY_HEDGED"),
            Self::Unwinding => write!(f, "UNWINDING"),
        }
    }
}

/// State owned by the session controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Expiration of the open hedge, set only on successful hedge entry.
    hedge_expiration: Option<NaiveDate>,
}

impl SessionState {
    /// State with no tracked hedge.
    #[must_use]
    pub const fn flat() -> Self {
        Self {
            hedge_expiration: None,
        }
    }

    /// Rehydrate the state of an already-open hedge.
    #[must_use]
    pub const fn resume(hedge_expiration: NaiveDate) -> Self {
        Self {
            hedge_expiration: Some(hedge_expiration),
        }
    }

    /// Tracked hedge expiration, if any.
    #[must_use]
    pub const fn hedge_expiration(&self) -> Option<NaiveDate> {
        self.hedge_expiration
    }

    /// Whether a hedge expiration is tracked.
    #[must_use]
    pub const fn is_tracking_hedge(&self) -> bool {
        self.hedge_expiration.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::{Holding, PositionRole};
    use crate::domain::shared::Symbol;
    use rust_decimal_macros::dec;

    #[test]
    fn flat_and_resume() {
        let expiry = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(SessionState::flat().hedge_expiration(), None);
        assert!(!SessionState::default().is_tracking_hedge());
        assert_eq!(SessionState::resume(expiry).hedge_expiration(), Some(expiry));
    }

    #[test]
    fn observe_phase() {
        let mut portfolio = PortfolioSnapshot::cash_only(dec!(100000));
        assert_eq!(SessionPhase::observe(&portfolio), SessionPhase::Flat);

        portfolio.holdings.push(Holding::new(
            Symbol::new("QQQ"),
            PositionRole::Underlying,
            200,
            dec!(400),
        ));
        assert_eq!(SessionPhase::observe(&portfolio), SessionPhase::Flat);

        portfolio.holdings.push(Holding::new(
            Symbol::new("QQQ240517P00395000"),
            PositionRole::Hedge,
            3,
            dec!(9.40),
        ));
        assert_eq!(SessionPhase::observe(&portfolio), SessionPhase::FullyHedged);
    }

    #[test]
    fn state_serde_round_trip() {
        let state = SessionState::resume(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"hedge_expiration":"2024-05-17"}"#);
    }
}
