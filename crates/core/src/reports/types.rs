//! Report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate totals for one item's stock card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    /// Sum of incoming quantities over the whole history.
    pub total_incoming_qty: u64,
    /// Sum of outgoing quantities over the whole history.
    pub total_outgoing_qty: u64,
    /// Quantity on hand after the latest entry.
    pub closing_qty: u32,
    /// Monetary value on hand after the latest entry.
    pub closing_value: Decimal,
}
