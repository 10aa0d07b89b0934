//! Hedge selection errors.

use thiserror::Error;

use crate::domain::option_position::OptionRight;

/// Error selecting a hedge contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No live contract of the requested right in the chain.
    #[error("No {right} contract found among {chain_size} chain entries")]
    NotFound {
        /// Requested right.
        right: OptionRight,
        /// Number of contracts in the chain that was searched.
        chain_size: usize,
    },
}
