//! Hedge Position Value Object
//!
//! Derived view of the open hedge. Exists only between a successful hedge
//! entry and the next liquidation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OptionContract;
use crate::domain::shared::{DomainError, Symbol};

/// The single open hedge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgePosition {
    /// Hedge contract symbol.
    pub symbol: Symbol,
    /// Expiration of the hedge contract.
    pub expiration: NaiveDate,
    /// Number of contracts held.
    pub quantity: i64,
    /// Premium paid at entry.
    pub entry_cost: Decimal,
}

impl HedgePosition {
    /// Build the hedge view for `quantity` contracts bought at the ask.
    ///
    /// # Errors
    ///
    /// Returns error if quantity is not positive.
    pub fn open(contract: &OptionContract, quantity: i64) -> Result<Self, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvariantViolation {
                entity: "HedgePosition".to_string(),
                invariant: "quantity > 0".to_string(),
            });
        }

        Ok(Self {
            symbol: contract.symbol().clone(),
            expiration: contract.expiration(),
            quantity,
            entry_cost: contract.premium(quantity),
        })
    }

    /// Calendar days remaining until the hedge expires.
    #[must_use]
    pub fn days_remaining(&self, as_of: NaiveDate) -> i64 {
        (self.expiration - as_of).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn contract() -> OptionContract {
        OptionContract::put("QQQ", dec!(380), NaiveDate::from_ymd_opt(2025, 3, 21).unwrap())
            .with_quote(dec!(7.25), dec!(-0.48))
    }

    #[test]
    fn open_records_cost_and_expiration() {
        let hedge = HedgePosition::open(&contract(), 3).unwrap();

        assert_eq!(hedge.quantity, 3);
        assert_eq!(hedge.entry_cost, dec!(2175));
        assert_eq!(hedge.expiration, NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
    }

    #[test]
    fn open_rejects_empty_hedge() {
        assert!(HedgePosition::open(&contract(), 0).is_err());
    }

    #[test]
    fn days_remaining() {
        let hedge = HedgePosition::open(&contract(), 1).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        assert_eq!(hedge.days_remaining(as_of), 30);
    }
}
