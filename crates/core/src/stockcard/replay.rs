//! Rebuilding a stock card from raw persisted rows.
//!
//! FIFO consumption state lives on the lot rows themselves, so once a
//! historical row is deleted or edited the distributed `consumed`
//! bookkeeping can no longer be trusted locally. The only consistent
//! remedy is a full deterministic replay: start from an empty card and
//! re-apply every surviving raw row in its original order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::card::StockCard;
use super::entry::{EntryKind, StockEntry};
use super::error::StockCardError;

/// One persisted row, before any trust is placed in its derived columns.
///
/// Running balances are never read back; they are derived state the replay
/// recomputes. On lot rows the persisted outgoing-quantity column holds the
/// legacy `consumed` counter (see the store's table layout) and is ignored
/// whenever the kind tag classifies the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Calendar date of the event.
    pub date: NaiveDate,
    /// Declared kind, if the persisted label was recognized.
    pub kind: Option<EntryKind>,
    /// Units the row added to stock.
    pub incoming_qty: u32,
    /// Unit cost of the incoming lot.
    pub incoming_unit_cost: Decimal,
    /// Units the row removed (or, on lot rows, the legacy consumed counter).
    pub outgoing_qty: u32,
    /// Cost basis the row removed.
    pub cost_of_goods_sold: Decimal,
}

impl RawRow {
    /// Projects a card entry into its raw persisted form.
    ///
    /// Lot rows store their `consumed` counter in the outgoing-quantity
    /// column, matching the on-disk table layout.
    #[must_use]
    pub fn from_entry(entry: &StockEntry) -> Self {
        let outgoing_qty = if entry.kind.is_lot_creating() {
            entry.consumed
        } else {
            entry.outgoing_qty
        };
        Self {
            date: entry.date,
            kind: Some(entry.kind),
            incoming_qty: entry.incoming_qty,
            incoming_unit_cost: entry.incoming_unit_cost,
            outgoing_qty,
            cost_of_goods_sold: entry.cost_of_goods_sold,
        }
    }
}

/// How a raw row re-enters the card during replay.
enum RowClass {
    Lot(EntryKind),
    Consuming(EntryKind),
    Stale,
}

/// Classifies a raw row, kind-first with a defensive quantity fallback.
///
/// A recognized kind wins outright, but a kind whose driving quantity is
/// zero marks the row stale (an unlabeled lot row's outgoing column is a
/// consumed counter, so incoming is checked before outgoing).
fn classify(row: &RawRow) -> RowClass {
    match row.kind {
        Some(kind) if kind.is_lot_creating() => {
            if row.incoming_qty > 0 {
                RowClass::Lot(kind)
            } else {
                RowClass::Stale
            }
        }
        Some(kind) => {
            if row.outgoing_qty > 0 {
                RowClass::Consuming(kind)
            } else {
                RowClass::Stale
            }
        }
        None if row.incoming_qty > 0 => RowClass::Lot(EntryKind::Purchase),
        None if row.outgoing_qty > 0 => RowClass::Consuming(EntryKind::Sale),
        None => RowClass::Stale,
    }
}

/// Rebuilds a card by replaying raw rows in order.
///
/// Lot rows re-enter at their persisted unit cost; consuming rows re-run
/// FIFO against the lots rebuilt so far, so every `consumed` counter,
/// allocation list, COGS figure, and running balance is recomputed from
/// scratch. Stale rows (no recognized kind and no driving quantity) are
/// dropped. Worst case O(n²) in the row count.
///
/// # Errors
///
/// Returns [`StockCardError::InsufficientStock`] if any consuming row can
/// no longer be covered by the stock available at its position; no partial
/// card escapes in that case.
pub fn replay(rows: &[RawRow]) -> Result<StockCard, StockCardError> {
    let mut card = StockCard::new();
    for row in rows {
        match classify(row) {
            RowClass::Lot(kind) => {
                card.push_lot(row.date, kind, row.incoming_qty, row.incoming_unit_cost);
            }
            RowClass::Consuming(kind) => {
                card.consume_fifo(row.date, row.outgoing_qty, kind)?;
            }
            RowClass::Stale => {}
        }
    }
    Ok(card)
}

/// Projects a card into the raw rows the store persists.
#[must_use]
pub fn raw_rows(card: &StockCard) -> Vec<RawRow> {
    card.entries().iter().map(RawRow::from_entry).collect()
}
