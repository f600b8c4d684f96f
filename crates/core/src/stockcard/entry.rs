//! Stock card entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of stock card entry.
///
/// Lot-creating kinds add stock at a unit cost; consuming kinds remove
/// stock by draining the oldest unconsumed lots first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Opening balance recorded when the item was registered.
    OpeningBalance,
    /// Goods received from a supplier.
    Purchase,
    /// Goods sold to a customer.
    Sale,
    /// Goods a customer returned (re-enters stock as a new lot).
    SalesReturn,
    /// Goods sent back to a supplier (leaves stock FIFO, like a sale).
    PurchaseReturn,
}

impl EntryKind {
    /// Returns true if this kind adds a lot to stock.
    #[must_use]
    pub fn is_lot_creating(self) -> bool {
        matches!(self, Self::OpeningBalance | Self::Purchase | Self::SalesReturn)
    }

    /// Returns true if this kind removes stock via FIFO consumption.
    #[must_use]
    pub fn is_consuming(self) -> bool {
        !self.is_lot_creating()
    }

    /// The fixed label this kind is persisted under.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OpeningBalance => "Opening Balance",
            Self::Purchase => "Purchase",
            Self::Sale => "Sale",
            Self::SalesReturn => "Sales Return",
            Self::PurchaseReturn => "Purchase Return",
        }
    }

    /// Parses a persisted label back into a kind.
    ///
    /// Returns `None` for unrecognized labels; callers decide whether such
    /// rows are reclassified defensively or dropped (see the replay module).
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Opening Balance" => Some(Self::OpeningBalance),
            "Purchase" => Some(Self::Purchase),
            "Sale" => Some(Self::Sale),
            "Sales Return" => Some(Self::SalesReturn),
            "Purchase Return" => Some(Self::PurchaseReturn),
            _ => None,
        }
    }
}

/// One draw a consuming entry made from a specific lot.
///
/// Consuming entries carry the full list of draws they made, so the cost
/// basis of any outflow can be audited without rescanning the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotAllocation {
    /// Position of the source lot entry in the card.
    pub lot_index: usize,
    /// Units drawn from that lot.
    pub qty: u32,
    /// Unit cost of the lot at the time of the draw.
    pub unit_cost: Decimal,
}

impl LotAllocation {
    /// Cost basis of this draw.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.qty) * self.unit_cost
    }
}

/// A single row of stock card history.
///
/// Lot rows (`incoming_qty > 0`) carry a `consumed` counter that later
/// consuming rows increment as they drain the lot. Consuming rows carry the
/// allocation list recording exactly which lots they drew from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// What kind of event this row records.
    pub kind: EntryKind,
    /// Units added to stock (zero on consuming rows).
    pub incoming_qty: u32,
    /// Unit cost of the incoming lot (ZERO on consuming rows).
    pub incoming_unit_cost: Decimal,
    /// Units removed from stock by this row (zero on lot rows).
    pub outgoing_qty: u32,
    /// Cost basis of the units this row removed (ZERO on lot rows).
    pub cost_of_goods_sold: Decimal,
    /// Quantity on hand immediately after this row.
    pub running_qty: u32,
    /// Monetary value on hand immediately after this row.
    pub running_value: Decimal,
    /// Lot rows only: units of this lot already drawn by later outflows.
    pub consumed: u32,
    /// Consuming rows only: the lots this row drew from.
    pub allocations: Vec<LotAllocation>,
}

impl StockEntry {
    /// Units of this lot still eligible for FIFO allocation.
    ///
    /// Always zero for consuming rows.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.incoming_qty - self.consumed
    }

    /// Signed quantity change this row applied to the balance.
    #[must_use]
    pub fn quantity_delta(&self) -> i64 {
        i64::from(self.incoming_qty) - i64::from(self.outgoing_qty)
    }

    /// Signed value change this row applied to the balance.
    #[must_use]
    pub fn value_delta(&self) -> Decimal {
        Decimal::from(self.incoming_qty) * self.incoming_unit_cost - self.cost_of_goods_sold
    }
}
