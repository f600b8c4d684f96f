//! Stock movement input types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::EntryKind;

/// A stock movement to record on a card.
///
/// This is the input format the store and any outer surface use to drive
/// the engine; `StockCard::apply` dispatches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "movement", rename_all = "snake_case")]
pub enum Movement {
    /// Goods received from a supplier at a unit cost.
    Purchase {
        /// Date of receipt.
        date: NaiveDate,
        /// Units received.
        qty: u32,
        /// Cost per unit.
        unit_cost: Decimal,
    },
    /// Goods sold to a customer; cost basis is derived FIFO.
    Sale {
        /// Date of sale.
        date: NaiveDate,
        /// Units sold.
        qty: u32,
    },
    /// Goods a customer returned; re-enters stock at the reconstructed
    /// average cost of the most recent sales.
    SalesReturn {
        /// Date of return.
        date: NaiveDate,
        /// Units returned.
        qty: u32,
    },
    /// Goods sent back to a supplier; leaves stock FIFO like a sale.
    PurchaseReturn {
        /// Date of return.
        date: NaiveDate,
        /// Units returned.
        qty: u32,
    },
}

impl Movement {
    /// The entry kind this movement records as.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Purchase { .. } => EntryKind::Purchase,
            Self::Sale { .. } => EntryKind::Sale,
            Self::SalesReturn { .. } => EntryKind::SalesReturn,
            Self::PurchaseReturn { .. } => EntryKind::PurchaseReturn,
        }
    }

    /// The date the movement happened on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Purchase { date, .. }
            | Self::Sale { date, .. }
            | Self::SalesReturn { date, .. }
            | Self::PurchaseReturn { date, .. } => *date,
        }
    }

    /// The quantity the movement moves.
    #[must_use]
    pub fn qty(&self) -> u32 {
        match self {
            Self::Purchase { qty, .. }
            | Self::Sale { qty, .. }
            | Self::SalesReturn { qty, .. }
            | Self::PurchaseReturn { qty, .. } => *qty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_movement_kind() {
        let purchase = Movement::Purchase {
            date: day(1),
            qty: 5,
            unit_cost: dec!(10),
        };
        assert_eq!(purchase.kind(), EntryKind::Purchase);
        assert_eq!(purchase.date(), day(1));
        assert_eq!(purchase.qty(), 5);

        let sale = Movement::Sale { date: day(2), qty: 3 };
        assert_eq!(sale.kind(), EntryKind::Sale);
        assert_eq!(
            Movement::SalesReturn { date: day(3), qty: 1 }.kind(),
            EntryKind::SalesReturn
        );
        assert_eq!(
            Movement::PurchaseReturn { date: day(4), qty: 1 }.kind(),
            EntryKind::PurchaseReturn
        );
    }
}
