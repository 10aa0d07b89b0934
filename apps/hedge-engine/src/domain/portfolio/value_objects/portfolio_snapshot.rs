//! Point-in-time portfolio state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Holding, PositionRole};
use crate::domain::shared::Symbol;

/// Holdings plus cash as reported by the portfolio collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// All reported holdings, including flat ones.
    pub holdings: Vec<Holding>,
    /// Cash available for new orders.
    pub cash: Decimal,
    /// Cash plus marked value of every holding.
    pub total_value: Decimal,
}

impl PortfolioSnapshot {
    /// Snapshot with only cash.
    #[must_use]
    pub const fn cash_only(cash: Decimal) -> Self {
        Self {
            holdings: Vec::new(),
            cash,
            total_value: cash,
        }
    }

    /// Whether any holding is open.
    #[must_use]
    pub fn is_invested(&self) -> bool {
        self.holdings.iter().any(Holding::is_invested)
    }

    /// Open holdings in reported order.
    pub fn invested_holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.iter().filter(|h| h.is_invested())
    }

    /// Look up a holding by symbol.
    #[must_use]
    pub fn holding(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.symbol == symbol)
    }

    /// Signed quantity held of the given underlying.
    #[must_use]
    pub fn underlying_quantity(&self, symbol: &Symbol) -> i64 {
        self.holdings
            .iter()
            .filter(|h| h.role == PositionRole::Underlying && &h.symbol == symbol)
            .map(|h| h.quantity)
            .sum()
    }

    /// Total hedge contracts held across every hedge holding.
    #[must_use]
    pub fn hedge_contracts(&self) -> i64 {
        self.holdings
            .iter()
            .filter(|h| h.is_hedge())
            .map(|h| h.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hedged() -> PortfolioSnapshot {
        PortfolioSnapshot {
            holdings: vec![
                Holding::new(Symbol::new("QQQ"), PositionRole::Underlying, 200, dec!(400)),
                Holding::new(Symbol::new("QQQ250117P00400000"), PositionRole::Hedge, 3, dec!(8)),
                Holding::new(Symbol::new("SPY"), PositionRole::Underlying, 0, dec!(500)),
            ],
            cash: dec!(17600),
            total_value: dec!(100000),
        }
    }

    #[test]
    fn cash_only_is_not_invested() {
        let snapshot = PortfolioSnapshot::cash_only(dec!(100000));
        assert!(!snapshot.is_invested());
        assert_eq!(snapshot.total_value, dec!(100000));
        assert_eq!(snapshot.hedge_contracts(), 0);
    }

    #[test]
    fn quantities_by_role() {
        let snapshot = hedged();
        assert!(snapshot.is_invested());
        assert_eq!(snapshot.underlying_quantity(&Symbol::new("QQQ")), 200);
        assert_eq!(snapshot.underlying_quantity(&Symbol::new("IWM")), 0);
        assert_eq!(snapshot.hedge_contracts(), 3);
    }

    #[test]
    fn invested_holdings_skip_flat() {
        let snapshot = hedged();
        let symbols: Vec<_> = snapshot
            .invested_holdings()
            .map(|h| h.symbol.as_str().to_string())
            .collect();
        assert_eq!(symbols, vec!["QQQ", "QQQ250117P00400000"]);
        assert!(snapshot.holding(&Symbol::new("SPY")).is_some());
    }
}
