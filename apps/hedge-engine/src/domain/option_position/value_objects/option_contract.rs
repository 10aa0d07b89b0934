//! Option Contract Value Object

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, Symbol};

/// Standard equity option multiplier.
pub const DEFAULT_MULTIPLIER: u32 = 100;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionRight {
    /// OCC symbol character for this right.
    #[must_use]
    pub const fn occ_code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }

    /// Plural label used in order tags ("Puts" / "Calls").
    #[must_use]
    pub const fn plural_label(self) -> &'static str {
        match self {
            Self::Call => "Calls",
            Self::Put => "Puts",
        }
    }
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Build an OCC-style option symbol without padding.
///
/// Format: `{ROOT}{YYMMDD}{C|P}{STRIKE x 1000, 8 digits}`.
#[must_use]
pub fn occ_symbol(
    underlying: &Symbol,
    expiration: NaiveDate,
    right: OptionRight,
    strike: Decimal,
) -> Symbol {
    let strike_thousandths = (strike * Decimal::from(1000))
        .trunc()
        .to_i64()
        .unwrap_or(0);
    Symbol::new(format!(
        "{}{}{}{:08}",
        underlying.as_str(),
        expiration.format("%y%m%d"),
        right.occ_code(),
        strike_thousandths
    ))
}

const fn default_multiplier() -> u32 {
    DEFAULT_MULTIPLIER
}

/// Immutable option contract snapshot for one evaluation moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionContract {
    /// OCC symbol (e.g., "QQQ250117P00400000").
    symbol: Symbol,
    /// Underlying symbol.
    underlying: Symbol,
    /// Strike price.
    strike: Decimal,
    /// Expiration date.
    expiration: NaiveDate,
    /// Call or put.
    right: OptionRight,
    /// Current ask price per share.
    ask: Decimal,
    /// Delta in [-1, 1].
    delta: Decimal,
    /// Contract multiplier (typically 100 for equity options).
    #[serde(default = "default_multiplier")]
    multiplier: u32,
}

impl OptionContract {
    /// Create a new option contract with a zero quote.
    ///
    /// The symbol is derived from the contract terms in OCC format.
    #[must_use]
    pub fn new(
        underlying: impl Into<Symbol>,
        strike: Decimal,
        expiration: NaiveDate,
        right: OptionRight,
    ) -> Self {
        let underlying = underlying.into();
        Self {
            symbol: occ_symbol(&underlying, expiration, right, strike),
            underlying,
            strike,
            expiration,
            right,
            ask: Decimal::ZERO,
            delta: Decimal::ZERO,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    /// Create a put option contract.
    #[must_use]
    pub fn put(underlying: impl Into<Symbol>, strike: Decimal, expiration: NaiveDate) -> Self {
        Self::new(underlying, strike, expiration, OptionRight::Put)
    }

    /// Create a call option contract.
    #[must_use]
    pub fn call(underlying: impl Into<Symbol>, strike: Decimal, expiration: NaiveDate) -> Self {
        Self::new(underlying, strike, expiration, OptionRight::Call)
    }

    /// Attach the current quote and delta.
    #[must_use]
    pub const fn with_quote(mut self, ask: Decimal, delta: Decimal) -> Self {
        self.ask = ask;
        self.delta = delta;
        self
    }

    /// Set a custom multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Get the OCC symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the underlying symbol.
    #[must_use]
    pub const fn underlying(&self) -> &Symbol {
        &self.underlying
    }

    /// Get the strike price.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    /// Get the expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Get the option right.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Get the ask price per share.
    #[must_use]
    pub const fn ask(&self) -> Decimal {
        self.ask
    }

    /// Get the delta.
    #[must_use]
    pub const fn delta(&self) -> Decimal {
        self.delta
    }

    /// Get the contract multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Calendar days from `as_of` until expiration (negative once expired).
    #[must_use]
    pub fn days_to_expiration(&self, as_of: NaiveDate) -> i64 {
        (self.expiration - as_of).num_days()
    }

    /// Check if the option has expired.
    #[must_use]
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiration < as_of
    }

    /// Premium to buy `contracts` contracts at the ask.
    #[must_use]
    pub fn premium(&self, contracts: i64) -> Decimal {
        self.ask * Decimal::from(self.multiplier) * Decimal::from(contracts)
    }

    /// Validate the snapshot values supplied by the chain collaborator.
    ///
    /// # Errors
    ///
    /// Returns error if delta is outside [-1, 1], the ask is negative,
    /// the strike is not positive, or the multiplier is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.delta < Decimal::NEGATIVE_ONE || self.delta > Decimal::ONE {
            return Err(DomainError::invalid("delta", "must be within [-1, 1]"));
        }
        if self.ask < Decimal::ZERO {
            return Err(DomainError::invalid("ask", "cannot be negative"));
        }
        if self.strike <= Decimal::ZERO {
            return Err(DomainError::invalid("strike", "must be positive"));
        }
        if self.multiplier == 0 {
            return Err(DomainError::invalid("multiplier", "must be positive"));
        }
        Ok(())
    }
}
