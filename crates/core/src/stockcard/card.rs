//! The stock card and the FIFO costing engine.
//!
//! A [`StockCard`] is the ordered, append-biased history of one item's
//! movements. All operations validate before mutating, so any returned
//! error leaves the card exactly as it was.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::{EntryKind, LotAllocation, StockEntry};
use super::error::StockCardError;
use super::types::Movement;

/// The ordered movement history of a single item.
///
/// Entries are never reordered. Removing a historical row is only possible
/// through the replay path (see [`super::replay`]), which rebuilds the
/// entire card from raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCard {
    entries: Vec<StockEntry>,
}

impl StockCard {
    /// Creates an empty card.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full entry history, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    /// Number of entries on the card.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no movement has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Quantity on hand after the latest entry (zero for an empty card).
    #[must_use]
    pub fn running_qty(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.running_qty)
    }

    /// Monetary value on hand after the latest entry (ZERO for an empty card).
    #[must_use]
    pub fn running_value(&self) -> Decimal {
        self.entries.last().map_or(Decimal::ZERO, |e| e.running_value)
    }

    /// Records a movement, dispatching to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns [`StockCardError`] if the movement fails validation; the card
    /// is unmodified in that case.
    pub fn apply(&mut self, movement: Movement) -> Result<(), StockCardError> {
        match movement {
            Movement::Purchase { date, qty, unit_cost } => self.apply_purchase(date, qty, unit_cost),
            Movement::Sale { date, qty } => self.apply_sale(date, qty),
            Movement::SalesReturn { date, qty } => self.apply_sales_return(date, qty),
            Movement::PurchaseReturn { date, qty } => self.apply_purchase_return(date, qty),
        }
    }

    /// Records a purchase: a new lot of `qty` units at `unit_cost` each.
    ///
    /// # Errors
    ///
    /// Returns [`StockCardError::InvalidQuantity`] if `qty` is zero.
    pub fn apply_purchase(
        &mut self,
        date: NaiveDate,
        qty: u32,
        unit_cost: Decimal,
    ) -> Result<(), StockCardError> {
        if qty == 0 {
            return Err(StockCardError::InvalidQuantity);
        }
        self.push_lot(date, EntryKind::Purchase, qty, unit_cost);
        Ok(())
    }

    /// Records the opening balance lot for a freshly registered item.
    ///
    /// # Errors
    ///
    /// Returns [`StockCardError::InvalidQuantity`] if `qty` is zero.
    pub fn apply_opening_balance(
        &mut self,
        date: NaiveDate,
        qty: u32,
        unit_cost: Decimal,
    ) -> Result<(), StockCardError> {
        if qty == 0 {
            return Err(StockCardError::InvalidQuantity);
        }
        self.push_lot(date, EntryKind::OpeningBalance, qty, unit_cost);
        Ok(())
    }

    /// Records a sale of `qty` units, costed FIFO against the oldest
    /// unconsumed lots.
    ///
    /// # Errors
    ///
    /// Returns [`StockCardError::InvalidQuantity`] if `qty` is zero, or
    /// [`StockCardError::InsufficientStock`] if `qty` exceeds the quantity
    /// on hand. The card is unmodified on error.
    pub fn apply_sale(&mut self, date: NaiveDate, qty: u32) -> Result<(), StockCardError> {
        self.consume_fifo(date, qty, EntryKind::Sale)
    }

    /// Records a customer return of `qty` previously sold units.
    ///
    /// The returned unit cost is not observed directly: it is reconstructed
    /// as the weighted average cost of the most recent `qty` units sold,
    /// scanning sale rows newest-first. The return then enters stock as a
    /// fresh lot; the original sale's source lots are NOT re-credited.
    ///
    /// A card with no prior sales prices the returned lot at ZERO.
    ///
    /// # Errors
    ///
    /// Returns [`StockCardError::InvalidQuantity`] if `qty` is zero.
    pub fn apply_sales_return(&mut self, date: NaiveDate, qty: u32) -> Result<(), StockCardError> {
        if qty == 0 {
            return Err(StockCardError::InvalidQuantity);
        }
        let unit_cost = self.recent_sale_unit_cost(qty);
        self.push_lot(date, EntryKind::SalesReturn, qty, unit_cost);
        Ok(())
    }

    /// Records a return of `qty` units to a supplier.
    ///
    /// Consumes existing lots FIFO exactly like a sale; only the recorded
    /// kind differs.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StockCard::apply_sale`].
    pub fn apply_purchase_return(&mut self, date: NaiveDate, qty: u32) -> Result<(), StockCardError> {
        self.consume_fifo(date, qty, EntryKind::PurchaseReturn)
    }

    /// Appends a lot row and extends the running balance.
    pub(crate) fn push_lot(&mut self, date: NaiveDate, kind: EntryKind, qty: u32, unit_cost: Decimal) {
        let running_qty = self.running_qty() + qty;
        let running_value = self.running_value() + Decimal::from(qty) * unit_cost;
        self.entries.push(StockEntry {
            date,
            kind,
            incoming_qty: qty,
            incoming_unit_cost: unit_cost,
            outgoing_qty: 0,
            cost_of_goods_sold: Decimal::ZERO,
            running_qty,
            running_value,
            consumed: 0,
            allocations: Vec::new(),
        });
    }

    /// Removes `qty` units FIFO and appends the consuming row.
    ///
    /// Validation runs before any lot counter moves, so failures leave the
    /// card untouched.
    pub(crate) fn consume_fifo(
        &mut self,
        date: NaiveDate,
        qty: u32,
        kind: EntryKind,
    ) -> Result<(), StockCardError> {
        if qty == 0 {
            return Err(StockCardError::InvalidQuantity);
        }
        let available = self.running_qty();
        if qty > available {
            return Err(StockCardError::InsufficientStock {
                requested: qty,
                available,
            });
        }

        // Oldest lot with unconsumed remainder first; ties between lots on
        // the same date resolve by insertion order, never by unit cost.
        let mut still_needed = qty;
        let mut cogs = Decimal::ZERO;
        let mut allocations = Vec::new();
        for (lot_index, lot) in self.entries.iter_mut().enumerate() {
            if still_needed == 0 {
                break;
            }
            if lot.kind.is_consuming() {
                continue;
            }
            let remaining = lot.remaining();
            if remaining == 0 {
                continue;
            }
            let take = remaining.min(still_needed);
            cogs += Decimal::from(take) * lot.incoming_unit_cost;
            lot.consumed += take;
            allocations.push(LotAllocation {
                lot_index,
                qty: take,
                unit_cost: lot.incoming_unit_cost,
            });
            still_needed -= take;
        }
        debug_assert_eq!(still_needed, 0, "precondition guarantees full coverage");

        let running_qty = available - qty;
        let running_value = self.running_value() - cogs;
        self.entries.push(StockEntry {
            date,
            kind,
            incoming_qty: 0,
            incoming_unit_cost: Decimal::ZERO,
            outgoing_qty: qty,
            cost_of_goods_sold: cogs,
            running_qty,
            running_value,
            consumed: 0,
            allocations,
        });
        Ok(())
    }

    /// Weighted average unit cost of the most recent `qty` units sold.
    ///
    /// Scans sale rows newest-first, covering `qty` units; ZERO when the
    /// card has no prior sales (or the sales cover nothing).
    fn recent_sale_unit_cost(&self, qty: u32) -> Decimal {
        if qty == 0 {
            return Decimal::ZERO;
        }
        let mut needed = qty;
        let mut total_value = Decimal::ZERO;
        for entry in self.entries.iter().rev() {
            if needed == 0 {
                break;
            }
            if entry.kind != EntryKind::Sale || entry.outgoing_qty == 0 {
                continue;
            }
            let take = needed.min(entry.outgoing_qty);
            let per_unit = entry.cost_of_goods_sold / Decimal::from(entry.outgoing_qty);
            total_value += Decimal::from(take) * per_unit;
            needed -= take;
        }
        total_value / Decimal::from(qty)
    }
}
