//! Symbol value object for instrument identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// A trading symbol (ticker or OCC option symbol).
///
/// Examples:
/// - Equity: "QQQ", "SPY"
/// - Option: "QQQ250117P00400000" (OCC format)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the symbol for order submission.
    ///
    /// # Errors
    ///
    /// Returns error if symbol is empty or contains invalid characters.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::invalid("symbol", "Symbol cannot be empty"));
        }

        if self.0.len() > 21 {
            return Err(DomainError::invalid(
                "symbol",
                "Symbol exceeds maximum length",
            ));
        }

        if !self.0.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid(
                "symbol",
                "Symbol contains invalid characters",
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_uppercased() {
        assert_eq!(Symbol::new("qqq").as_str(), "QQQ");
    }

    #[test]
    fn symbol_validate() {
        assert!(Symbol::new("QQQ").validate().is_ok());
        assert!(Symbol::new("QQQ250117P00400000").validate().is_ok());
        assert!(Symbol::new("").validate().is_err());
        assert!(Symbol::new("BRK.B").validate().is_err());
        assert!(Symbol::new("A".repeat(22)).validate().is_err());
    }

    #[test]
    fn symbol_serde_transparent() {
        let json = serde_json::to_string(&Symbol::new("spy")).unwrap();
        assert_eq!(json, "\"SPY\"");
    }
}
