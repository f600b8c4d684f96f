//! Item store error types.

use kardex_core::stockcard::StockCardError;
use thiserror::Error;

/// Errors that can occur during item store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No item with the given name is registered.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// An item with the given name is already registered.
    #[error("Item already exists: {0}")]
    ItemExists(String),

    /// The item name cannot be used as a table file name.
    #[error("Invalid item name: {0:?}")]
    InvalidItemName(String),

    /// The deletion index does not address a row of the card.
    #[error("Row {index} is out of range for a card of {len} rows")]
    RowOutOfRange {
        /// The zero-based row position requested.
        index: usize,
        /// The number of rows on the card.
        len: usize,
    },

    /// The underlying engine rejected the operation.
    #[error("{0}")]
    Card(#[from] StockCardError),

    /// A stock card table could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownItem(_) => "UNKNOWN_ITEM",
            Self::ItemExists(_) => "ITEM_EXISTS",
            Self::InvalidItemName(_) => "INVALID_ITEM_NAME",
            Self::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            Self::Card(_) => "CARD_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}
