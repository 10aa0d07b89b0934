//! Domain errors for the hedge engine.

use std::fmt;

/// Domain-level errors raised while constructing or validating domain values.
///
/// These errors are independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value for a field.
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Invariant violated by a combination of values.
    InvariantViolation {
        /// Entity type.
        entity: String,
        /// Invariant that was violated.
        invariant: String,
    },
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidValue`].
    #[must_use]
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::InvariantViolation { entity, invariant } => {
                write!(f, "Invariant violation in {entity}: {invariant}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
