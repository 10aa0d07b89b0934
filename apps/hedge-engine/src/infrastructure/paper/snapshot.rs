//! JSON market snapshot consumed by the paper platform.
//!
//! ```json
//! {
//!   "as_of": "2024-04-15",
//!   "prices": { "QQQ": "400.00" },
//!   "chains": [
//!     { "underlying": "QQQ", "strike": "395", "expiration": "2024-06-14",
//!       "right": "PUT", "ask": "9.40", "delta": "-0.48" }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PaperError;
use crate::domain::option_position::{OptionContract, OptionRight};
use crate::domain::shared::Symbol;

/// One quoted contract in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractQuote {
    /// Underlying ticker.
    pub underlying: Symbol,
    /// Strike price.
    pub strike: Decimal,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Call or put.
    pub right: OptionRight,
    /// Ask per share.
    pub ask: Decimal,
    /// Delta.
    pub delta: Decimal,
    /// Contract multiplier, 100 when omitted.
    #[serde(default)]
    pub multiplier: Option<u32>,
}

impl ContractQuote {
    /// Domain contract for this quote.
    #[must_use]
    pub fn to_contract(&self) -> OptionContract {
        let contract = OptionContract::new(self.underlying.clone(), self.strike, self.expiration, self.right)
            .with_quote(self.ask, self.delta);
        match self.multiplier {
            Some(multiplier) => contract.with_multiplier(multiplier),
            None => contract,
        }
    }
}

/// Spot prices and option chains at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Trading date the snapshot belongs to.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Spot price per instrument.
    #[serde(default)]
    pub prices: HashMap<Symbol, Decimal>,
    /// Quoted contracts across all underlyings.
    #[serde(default)]
    pub chains: Vec<ContractQuote>,
}

impl MarketSnapshot {
    /// Read a snapshot from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PaperError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| PaperError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Contracts grouped by underlying.
    #[must_use]
    pub fn chains_by_underlying(&self) -> HashMap<Symbol, Vec<OptionContract>> {
        let mut chains: HashMap<Symbol, Vec<OptionContract>> = HashMap::new();
        for quote in &self.chains {
            chains
                .entry(quote.underlying.clone())
                .or_default()
                .push(quote.to_contract());
        }
        chains
    }
}
