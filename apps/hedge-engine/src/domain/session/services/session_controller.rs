//! Session controller: the daily enter / hold / unwind decision.
//!
//! Decision order:
//! 1. Nothing invested, or invested with zero hedge contracts: enter.
//! 2. Hedged without a tracked expiration: unwind (untracked hedge).
//! 3. `days_remaining <= floor(initial_horizon_days * exit_horizon_fraction)`: unwind.
//! 4. Otherwise hold.
//!
//! The decision depends only on the holdings, the date, the parameters and
//! the tracked hedge expiration.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::portfolio::{Holding, PortfolioSnapshot, PositionRole};
use crate::domain::position_sizing::SizingParameters;
use crate::domain::session::{Liquidation, SessionDecision, SessionState, UnwindReason};

/// Stateless session controller.
#[derive(Debug, Clone)]
pub struct SessionController {
    params: SizingParameters,
}

impl SessionController {
    /// Create a controller for the given parameters.
    #[must_use]
    pub const fn new(params: SizingParameters) -> Self {
        Self { params }
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &SizingParameters {
        &self.params
    }

    /// Decide what to do this session.
    #[must_use]
    pub fn assess(
        &self,
        state: &SessionState,
        portfolio: &PortfolioSnapshot,
        today: NaiveDate,
    ) -> SessionDecision {
        if !portfolio.is_invested() || portfolio.hedge_contracts() == 0 {
            return SessionDecision::Enter;
        }

        let Some(expiration) = state.hedge_expiration() else {
            return SessionDecision::Unwind {
                reason: UnwindReason::UntrackedHedge,
                liquidations: self.liquidations(portfolio, "Untracked hedge."),
            };
        };

        let days_remaining = (expiration - today).num_days();
        if self.should_roll(days_remaining) {
            SessionDecision::Unwind {
                reason: UnwindReason::RollWindow { days_remaining },
                liquidations: self.liquidations(portfolio, &format!("{days_remaining} DTE.")),
            }
        } else {
            SessionDecision::Hold { days_remaining }
        }
    }

    /// Whether a hedge with `days_remaining` calendar days left must be rolled.
    #[must_use]
    pub fn should_roll(&self, days_remaining: i64) -> bool {
        days_remaining <= self.params.exit_threshold_days()
    }

    /// Tag for liquidating one holding.
    ///
    /// Format: `" {prefix} Sold {Puts|Shares} [ {pct}% {Profit|Loss} ]"`.
    #[must_use]
    pub fn liquidation_tag(&self, holding: &Holding, prefix: &str) -> String {
        let label = match holding.role {
            PositionRole::Hedge => self.params.hedge_right.plural_label(),
            PositionRole::Underlying => "Shares",
        };
        let change = holding.unrealized_pnl_pct.round_dp(2);
        let outcome = if change > Decimal::ZERO {
            "Profit"
        } else {
            "Loss"
        };
        format!(" {prefix} Sold {label} [ {change}% {outcome} ]")
    }

    fn liquidations(&self, portfolio: &PortfolioSnapshot, prefix: &str) -> Vec<Liquidation> {
        portfolio
            .invested_holdings()
            .map(|holding| Liquidation {
                symbol: holding.symbol.clone(),
                role: holding.role,
                quantity: holding.quantity,
                tag: self.liquidation_tag(holding, prefix),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::Symbol;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    fn controller() -> SessionController {
        SessionController::new(SizingParameters::default())
    }

    fn hedged_portfolio() -> PortfolioSnapshot {
        PortfolioSnapshot {
            holdings: vec![
                Holding::new(Symbol::new("QQQ"), PositionRole::Underlying, 200, dec!(400))
                    .with_unrealized_pnl_pct(dec!(3.456)),
                Holding::new(Symbol::new("QQQ240517P00395000"), PositionRole::Hedge, 3, dec!(9.40))
                    .with_unrealized_pnl_pct(dec!(-41.2)),
            ],
            cash: dec!(17179),
            total_value: dec!(100000),
        }
    }

    #[test]
    fn flat_portfolio_enters() {
        let decision = controller().assess(
            &SessionState::flat(),
            &PortfolioSnapshot::cash_only(dec!(100000)),
            today(),
        );
        assert_eq!(decision, SessionDecision::Enter);
    }

    #[test]
    fn shares_without_hedge_enter() {
        let mut portfolio = hedged_portfolio();
        portfolio.holdings.retain(|h| !h.is_hedge());

        let decision = controller().assess(
            &SessionState::resume(today() + Duration::days(10)),
            &portfolio,
            today(),
        );
        assert_eq!(decision, SessionDecision::Enter);
    }

    #[test_case(31, false ; "one day outside the window holds")]
    #[test_case(30, true ; "threshold day unwinds")]
    #[test_case(5, true ; "deep inside the window unwinds")]
    #[test_case(59, false ; "fresh hedge holds")]
    fn roll_trigger_boundary(days_remaining: i64, unwinds: bool) {
        let state = SessionState::resume(today() + Duration::days(days_remaining));
        let decision = controller().assess(&state, &hedged_portfolio(), today());

        match decision {
            SessionDecision::Unwind { reason, .. } => {
                assert!(unwinds);
                assert_eq!(reason, UnwindReason::RollWindow { days_remaining });
            }
            SessionDecision::Hold { days_remaining: left } => {
                assert!(!unwinds);
                assert_eq!(left, days_remaining);
            }
            SessionDecision::Enter => panic!("hedged portfolio should not enter"),
        }
    }

    #[test]
    fn unwind_liquidates_every_open_position_with_tags() {
        let state = SessionState::resume(today() + Duration::days(30));
        let decision = controller().assess(&state, &hedged_portfolio(), today());

        let SessionDecision::Unwind { liquidations, .. } = decision else {
            panic!("expected unwind");
        };
        assert_eq!(liquidations.len(), 2);
        assert_eq!(liquidations[0].role, PositionRole::Underlying);
        assert_eq!(liquidations[0].tag, " 30 DTE. Sold Shares [ 3.46% Profit ]");
        assert_eq!(liquidations[1].role, PositionRole::Hedge);
        assert_eq!(liquidations[1].quantity, 3);
        assert_eq!(liquidations[1].tag, " 30 DTE. Sold Puts [ -41.2% Loss ]");
    }

    #[test]
    fn hedge_without_tracked_expiration_unwinds() {
        let decision = controller().assess(&SessionState::flat(), &hedged_portfolio(), today());

        let SessionDecision::Unwind {
            reason,
            liquidations,
        } = decision
        else {
            panic!("expected unwind");
        };
        assert_eq!(reason, UnwindReason::UntrackedHedge);
        assert!(liquidations[0].tag.starts_with(" Untracked hedge. Sold Shares"));
    }

    #[test]
    fn zero_change_is_reported_as_loss() {
        let holding = Holding::new(Symbol::new("QQQ"), PositionRole::Underlying, 100, dec!(400));
        assert_eq!(
            controller().liquidation_tag(&holding, "12 DTE."),
            " 12 DTE. Sold Shares [ 0% Loss ]"
        );
    }

    #[test]
    fn same_inputs_same_decision() {
        let state = SessionState::resume(today() + Duration::days(45));
        let first = controller().assess(&state, &hedged_portfolio(), today());
        let second = controller().assess(&state, &hedged_portfolio(), today());
        assert_eq!(first, second);
    }
}
