//! Stock card error types.

use thiserror::Error;

/// Errors that can occur during stock card operations.
///
/// Every failure is raised before any entry is appended or any lot counter
/// is touched, so a returned error always means the card is unmodified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockCardError {
    /// Requested outgoing quantity exceeds the quantity on hand.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units the caller asked to remove.
        requested: u32,
        /// Units actually on hand.
        available: u32,
    },

    /// A movement was recorded with a zero quantity.
    #[error("Quantity must be positive")]
    InvalidQuantity,
}

impl StockCardError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::InvalidQuantity => "INVALID_QUANTITY",
        }
    }
}
