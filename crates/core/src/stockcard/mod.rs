//! FIFO inventory costing logic.
//!
//! This module implements the core stock card functionality:
//! - Stock card entries (lots and consumptions)
//! - The FIFO costing engine (purchases, sales, returns)
//! - Replay/rebuild from raw persisted rows
//! - Domain types for recording movements
//! - Error types for stock card operations

pub mod card;
pub mod entry;
pub mod error;
pub mod replay;
pub mod types;

#[cfg(test)]
mod card_props;

pub use card::StockCard;
pub use entry::{EntryKind, LotAllocation, StockEntry};
pub use error::StockCardError;
pub use replay::{raw_rows, replay, RawRow};
pub use types::Movement;
