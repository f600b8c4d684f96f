//! The flat CSV table format for one item's stock card.
//!
//! One row per entry with columns exactly: `date, kind, incoming_qty,
//! incoming_unit_cost, outgoing_qty, cost_of_goods_sold, running_qty,
//! running_value`. On lot rows the `outgoing_qty` column carries the lot's
//! `consumed` counter (the legacy table layout this store stays compatible
//! with); loading never trusts it, cards are always rebuilt by replay.

use std::io::{Read, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kardex_core::stockcard::{EntryKind, RawRow, StockCard, StockEntry};

use crate::error::StoreError;

/// One persisted CSV row. Field order is the on-disk column order.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    date: NaiveDate,
    kind: String,
    incoming_qty: u32,
    incoming_unit_cost: Decimal,
    outgoing_qty: u32,
    cost_of_goods_sold: Decimal,
    running_qty: u32,
    running_value: Decimal,
}

impl Record {
    fn from_entry(entry: &StockEntry) -> Self {
        let outgoing_qty = if entry.kind.is_lot_creating() {
            entry.consumed
        } else {
            entry.outgoing_qty
        };
        Self {
            date: entry.date,
            kind: entry.kind.label().to_string(),
            incoming_qty: entry.incoming_qty,
            incoming_unit_cost: entry.incoming_unit_cost,
            outgoing_qty,
            cost_of_goods_sold: entry.cost_of_goods_sold,
            running_qty: entry.running_qty,
            running_value: entry.running_value,
        }
    }

    fn into_raw_row(self) -> RawRow {
        RawRow {
            date: self.date,
            kind: EntryKind::parse_label(&self.kind),
            incoming_qty: self.incoming_qty,
            incoming_unit_cost: self.incoming_unit_cost,
            outgoing_qty: self.outgoing_qty,
            cost_of_goods_sold: self.cost_of_goods_sold,
        }
    }
}

/// Reads the raw rows of one stock card table.
///
/// Unrecognized kind labels come back as `kind: None`; the replay decides
/// whether such rows are reclassified or dropped.
///
/// # Errors
///
/// Returns [`StoreError::Csv`] if a row cannot be parsed.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, StoreError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let record: Record = record?;
        rows.push(record.into_raw_row());
    }
    Ok(rows)
}

/// Writes the full entry sequence of a card as a flat CSV table.
///
/// This is also the report/export surface: callers hand in any
/// [`Write`] sink (a file, a download buffer, stdout).
///
/// # Errors
///
/// Returns [`StoreError::Csv`] or [`StoreError::Io`] if serialization or
/// the sink fails.
pub fn write_card<W: Write>(writer: W, card: &StockCard) -> Result<(), StoreError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for entry in card.entries() {
        csv_writer.serialize(Record::from_entry(entry))?;
    }
    csv_writer.flush()?;
    Ok(())
}
