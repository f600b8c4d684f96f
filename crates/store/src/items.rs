//! The item store: one CSV stock card table per item.
//!
//! Derived state (running balances, consumed counters, allocations) is
//! never trusted from disk: every load replays the raw rows through the
//! engine, so externally edited tables still come back consistent.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use kardex_core::stockcard::{raw_rows, replay, Movement, StockCard};

use crate::codec;
use crate::error::StoreError;

/// Opening stock recorded when an item is registered.
#[derive(Debug, Clone, Copy)]
pub struct OpeningBalance {
    /// Date the balance was taken.
    pub date: NaiveDate,
    /// Units on hand.
    pub qty: u32,
    /// Cost per unit.
    pub unit_cost: Decimal,
}

/// File-backed collection of stock cards, keyed by item name.
///
/// All mutating operations hold the write lock across apply-and-persist,
/// so concurrent callers cannot interleave a load-modify-save race. Cards
/// handed out are snapshots; the store owns the authoritative state.
#[derive(Debug)]
pub struct ItemStore {
    data_dir: PathBuf,
    cards: RwLock<HashMap<String, StockCard>>,
}

impl ItemStore {
    /// Opens the store rooted at `data_dir`, creating the directory if
    /// needed and replaying every `<item>.csv` table found there.
    ///
    /// A table that no longer replays (e.g. externally edited into an
    /// uncoverable sale) is skipped with a warning rather than poisoning
    /// the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or
    /// scanned.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let mut cards = HashMap::new();
        for dir_entry in fs::read_dir(&data_dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Self::load_card(&path) {
                Ok(card) => {
                    cards.insert(name.to_string(), card);
                }
                Err(error) => {
                    warn!(item = %name, %error, "skipping stock card table that does not replay");
                }
            }
        }
        info!(dir = %data_dir.display(), items = cards.len(), "item store opened");

        Ok(Self {
            data_dir,
            cards: RwLock::new(cards),
        })
    }

    /// All registered item names, sorted.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        let cards = self.cards.read().expect("item store lock poisoned");
        let mut names: Vec<String> = cards.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns true if an item with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let cards = self.cards.read().expect("item store lock poisoned");
        cards.contains_key(name)
    }

    /// A snapshot of one item's card.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownItem`] if the item is not registered.
    pub fn get(&self, name: &str) -> Result<StockCard, StoreError> {
        let cards = self.cards.read().expect("item store lock poisoned");
        cards
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownItem(name.to_string()))
    }

    /// Registers a new item, optionally seeded with an opening balance lot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemExists`] for a duplicate name,
    /// [`StoreError::InvalidItemName`] for a name unusable as a file name,
    /// or [`StoreError::Card`] if the opening quantity is zero.
    pub fn create_item(
        &self,
        name: &str,
        opening: Option<OpeningBalance>,
    ) -> Result<StockCard, StoreError> {
        validate_item_name(name)?;

        let mut cards = self.cards.write().expect("item store lock poisoned");
        if cards.contains_key(name) {
            return Err(StoreError::ItemExists(name.to_string()));
        }

        let mut card = StockCard::new();
        if let Some(opening) = opening {
            card.apply_opening_balance(opening.date, opening.qty, opening.unit_cost)?;
        }
        self.persist(name, &card)?;
        cards.insert(name.to_string(), card.clone());
        info!(item = %name, seeded = card.len() == 1, "item registered");
        Ok(card)
    }

    /// Records one movement on an item's card and persists the result.
    ///
    /// Apply-then-persist runs on a working copy; the in-memory card only
    /// advances once the table write succeeded, so a failure at any point
    /// leaves the store exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownItem`] if the item is not registered,
    /// [`StoreError::Card`] if the engine rejects the movement, or an I/O
    /// error if persisting fails.
    pub fn record(&self, name: &str, movement: Movement) -> Result<StockCard, StoreError> {
        let mut cards = self.cards.write().expect("item store lock poisoned");
        let card = cards
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownItem(name.to_string()))?;

        let mut next = card.clone();
        next.apply(movement)?;
        self.persist(name, &next)?;
        *card = next.clone();
        info!(
            item = %name,
            kind = ?movement.kind(),
            qty = movement.qty(),
            running_qty = next.running_qty(),
            "movement recorded"
        );
        Ok(next)
    }

    /// Deletes the row at a zero-based position and rebuilds the card by
    /// replaying the surviving raw rows.
    ///
    /// A successful rebuild is the new truth: FIFO consumption may be
    /// retroactively reassigned to different lots, repricing later COGS.
    /// If any surviving outflow can no longer be covered, the deletion is
    /// rejected and the stored card stays untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownItem`], [`StoreError::RowOutOfRange`],
    /// or [`StoreError::Card`] when the rebuild is infeasible.
    pub fn delete_row(&self, name: &str, index: usize) -> Result<StockCard, StoreError> {
        let mut cards = self.cards.write().expect("item store lock poisoned");
        let card = cards
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownItem(name.to_string()))?;

        let len = card.len();
        if index >= len {
            return Err(StoreError::RowOutOfRange { index, len });
        }

        let mut rows = raw_rows(card);
        rows.remove(index);
        let rebuilt = replay(&rows)?;

        self.persist(name, &rebuilt)?;
        *card = rebuilt.clone();
        info!(item = %name, index, rows = rebuilt.len(), "row deleted, card rebuilt");
        Ok(rebuilt)
    }

    /// Serializes one item's full table to any sink (the export surface).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownItem`] if the item is not registered,
    /// or a codec error if the sink fails.
    pub fn export_csv<W: Write>(&self, name: &str, writer: W) -> Result<(), StoreError> {
        let cards = self.cards.read().expect("item store lock poisoned");
        let card = cards
            .get(name)
            .ok_or_else(|| StoreError::UnknownItem(name.to_string()))?;
        codec::write_card(writer, card)
    }

    fn load_card(path: &Path) -> Result<StockCard, StoreError> {
        let file = File::open(path)?;
        let rows = codec::read_rows(file)?;
        Ok(replay(&rows)?)
    }

    fn persist(&self, name: &str, card: &StockCard) -> Result<(), StoreError> {
        let file = File::create(self.card_path(name))?;
        codec::write_card(file, card)
    }

    fn card_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.csv"))
    }
}

/// Item names double as table file names, so path-like names are refused.
fn validate_item_name(name: &str) -> Result<(), StoreError> {
    let usable = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && name.trim() == name;
    if usable {
        Ok(())
    } else {
        Err(StoreError::InvalidItemName(name.to_string()))
    }
}
