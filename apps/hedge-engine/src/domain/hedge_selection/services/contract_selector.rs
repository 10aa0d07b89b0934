//! Delta/horizon contract selection.
//!
//! Candidates are the live contracts of the requested right. The winner
//! minimizes, in order:
//! 1. `|delta - target_delta|`
//! 2. `|dte - target_dte|`
//! 3. strike (lowest first)
//! 4. expiration (earliest first)
//! 5. symbol
//!
//! The ordering is total, so the choice never depends on chain order.

use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::hedge_selection::SelectionError;
use crate::domain::option_position::{OptionContract, OptionRight};

/// What the selector is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeTarget {
    /// Target delta in [-1, 1].
    pub delta: Decimal,
    /// Target calendar days to expiration.
    pub dte: i64,
    /// Required option right.
    pub right: OptionRight,
}

/// Stateless contract selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractSelector;

impl ContractSelector {
    /// Select the best-matching contract from `chain` as of `as_of`.
    ///
    /// Contracts that are expired or fail validation are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::NotFound`] if the chain is empty or holds
    /// no usable contract of the requested right.
    pub fn select_contract(
        chain: &[OptionContract],
        target: &HedgeTarget,
        as_of: NaiveDate,
    ) -> Result<OptionContract, SelectionError> {
        chain
            .iter()
            .filter(|c| c.right() == target.right)
            .filter(|c| !c.is_expired(as_of))
            .filter(|c| c.validate().is_ok())
            .min_by(|a, b| Self::compare(a, b, target, as_of))
            .cloned()
            .ok_or(SelectionError::NotFound {
                right: target.right,
                chain_size: chain.len(),
            })
    }

    fn compare(
        a: &OptionContract,
        b: &OptionContract,
        target: &HedgeTarget,
        as_of: NaiveDate,
    ) -> Ordering {
        let delta_distance = |c: &OptionContract| (c.delta() - target.delta).abs();
        let dte_distance = |c: &OptionContract| (c.days_to_expiration(as_of) - target.dte).abs();

        delta_distance(a)
            .cmp(&delta_distance(b))
            .then_with(|| dte_distance(a).cmp(&dte_distance(b)))
            .then_with(|| a.strike().cmp(&b.strike()))
            .then_with(|| a.expiration().cmp(&b.expiration()))
            .then_with(|| a.symbol().cmp(b.symbol()))
    }
}
