//! Property-based tests for the FIFO costing engine.
//!
//! - Running balance integrity over arbitrary movement sequences
//! - Lot consumption bounds and FIFO allocation consistency
//! - Value conservation under exact integer-cost arithmetic
//! - Replay idempotence

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::card::StockCard;
use super::entry::EntryKind;
use super::replay::{raw_rows, replay};
use super::types::Movement;

/// Strategy for a movement date within one month.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1u32..=28).prop_map(|d| NaiveDate::from_ymd_opt(2026, 4, d).unwrap())
}

/// Strategy for whole-unit lot costs, kept integral so every COGS figure
/// stays exactly representable.
fn unit_cost_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=500).prop_map(Decimal::from)
}

/// Strategy for one movement. Outflow quantities are kept small relative
/// to purchase quantities so sequences routinely stay applicable.
fn movement_strategy() -> impl Strategy<Value = Movement> {
    prop_oneof![
        (date_strategy(), 1u32..=50, unit_cost_strategy())
            .prop_map(|(date, qty, unit_cost)| Movement::Purchase { date, qty, unit_cost }),
        (date_strategy(), 1u32..=20).prop_map(|(date, qty)| Movement::Sale { date, qty }),
        (date_strategy(), 1u32..=10).prop_map(|(date, qty)| Movement::SalesReturn { date, qty }),
        (date_strategy(), 1u32..=10).prop_map(|(date, qty)| Movement::PurchaseReturn { date, qty }),
    ]
}

fn movements_strategy(max_len: usize) -> impl Strategy<Value = Vec<Movement>> {
    prop::collection::vec(movement_strategy(), 1..=max_len)
}

/// Applies a sequence, skipping movements the engine rejects.
///
/// Rejections are themselves part of the contract: the card must be
/// unchanged afterwards, which every property below relies on.
fn apply_all(movements: &[Movement]) -> StockCard {
    let mut card = StockCard::new();
    for movement in movements {
        let before = card.clone();
        if card.apply(*movement).is_err() {
            assert_eq!(card, before, "failed apply must not mutate the card");
        }
    }
    card
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* applied sequence, the running quantity after every entry
    /// SHALL equal cumulative incoming minus cumulative outgoing, and the
    /// balance never goes negative.
    #[test]
    fn prop_running_qty_tracks_flows(movements in movements_strategy(30)) {
        let card = apply_all(&movements);

        let mut net: i64 = 0;
        for entry in card.entries() {
            net += entry.quantity_delta();
            prop_assert!(net >= 0, "running balance must never go negative");
            prop_assert_eq!(net, i64::from(entry.running_qty));
        }
    }

    /// *For any* applied sequence, no lot is ever consumed beyond its
    /// incoming quantity, and only lot rows carry consumption.
    #[test]
    fn prop_consumed_bounded_by_lot_size(movements in movements_strategy(30)) {
        let card = apply_all(&movements);

        for entry in card.entries() {
            prop_assert!(entry.consumed <= entry.incoming_qty);
            if entry.kind.is_consuming() {
                prop_assert_eq!(entry.consumed, 0);
                prop_assert_eq!(entry.incoming_qty, 0);
            }
        }
    }

    /// *For any* applied sequence, every consuming row's allocations sum to
    /// its outgoing quantity and price out to its COGS, every referenced
    /// lot precedes the consumer, and every lot's consumed counter equals
    /// the total drawn against it.
    #[test]
    fn prop_allocations_are_consistent(movements in movements_strategy(30)) {
        let card = apply_all(&movements);

        let mut drawn = vec![0u32; card.len()];
        for (i, entry) in card.entries().iter().enumerate() {
            if entry.kind.is_lot_creating() {
                prop_assert!(entry.allocations.is_empty());
                continue;
            }
            let qty_sum: u32 = entry.allocations.iter().map(|a| a.qty).sum();
            let cost_sum: Decimal = entry.allocations.iter().map(|a| a.cost()).sum();
            prop_assert_eq!(qty_sum, entry.outgoing_qty);
            prop_assert_eq!(cost_sum, entry.cost_of_goods_sold);
            for alloc in &entry.allocations {
                prop_assert!(alloc.lot_index < i, "allocation must reference an earlier row");
                let lot = &card.entries()[alloc.lot_index];
                prop_assert!(lot.kind.is_lot_creating());
                prop_assert_eq!(alloc.unit_cost, lot.incoming_unit_cost);
                drawn[alloc.lot_index] += alloc.qty;
            }
        }
        for (entry, total_drawn) in card.entries().iter().zip(drawn) {
            prop_assert_eq!(entry.consumed, total_drawn);
        }
    }

    /// *For any* applied sequence, FIFO ordering holds: a lot is never
    /// drawn while an older lot still has unconsumed remainder at that
    /// moment. Equivalently, within one consuming row the allocation list
    /// is ordered and each drawn lot except the last is fully drained.
    #[test]
    fn prop_fifo_drains_oldest_first(movements in movements_strategy(30)) {
        let card = apply_all(&movements);

        for entry in card.entries() {
            let allocs = &entry.allocations;
            for pair in allocs.windows(2) {
                prop_assert!(pair[0].lot_index < pair[1].lot_index);
            }
            for alloc in allocs.iter().rev().skip(1) {
                let lot = &card.entries()[alloc.lot_index];
                prop_assert!(
                    lot.consumed == lot.incoming_qty,
                    "a non-final drawn lot must be fully drained before newer lots are touched"
                );
            }
        }
    }

    /// *For any* sequence of integer-cost purchases and FIFO outflows, the
    /// running value SHALL equal the sum of every lot's unconsumed
    /// remainder at its unit cost (exact arithmetic, no rounding).
    #[test]
    fn prop_value_conserved_for_integer_costs(
        movements in prop::collection::vec(
            prop_oneof![
                (date_strategy(), 1u32..=50, unit_cost_strategy())
                    .prop_map(|(date, qty, unit_cost)| Movement::Purchase { date, qty, unit_cost }),
                (date_strategy(), 1u32..=20).prop_map(|(date, qty)| Movement::Sale { date, qty }),
                (date_strategy(), 1u32..=10)
                    .prop_map(|(date, qty)| Movement::PurchaseReturn { date, qty }),
            ],
            1..=30,
        )
    ) {
        let card = apply_all(&movements);

        let mut value = Decimal::ZERO;
        for entry in card.entries() {
            value += entry.value_delta();
            prop_assert_eq!(value, entry.running_value);
        }

        let lot_value: Decimal = card
            .entries()
            .iter()
            .filter(|e| e.kind.is_lot_creating())
            .map(|e| Decimal::from(e.remaining()) * e.incoming_unit_cost)
            .sum();
        prop_assert_eq!(card.running_value(), lot_value);
    }

    /// *For any* applied sequence, replaying the raw projection of the
    /// resulting card SHALL reproduce it exactly.
    #[test]
    fn prop_replay_is_idempotent(movements in movements_strategy(30)) {
        let card = apply_all(&movements);
        let rebuilt = replay(&raw_rows(&card));
        prop_assert_eq!(rebuilt, Ok(card));
    }

    /// *For any* applied sequence, an oversized sale fails with
    /// InsufficientStock and leaves the card untouched.
    #[test]
    fn prop_oversell_is_atomic(
        movements in movements_strategy(20),
        extra in 1u32..=100,
    ) {
        let mut card = apply_all(&movements);
        let before = card.clone();
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let result = card.apply_sale(date, card.running_qty() + extra);
        prop_assert!(result.is_err());
        prop_assert_eq!(card, before);
    }

    /// *For any* applied sequence, every lot-creating entry has zero COGS
    /// and every consuming entry has zero incoming columns.
    #[test]
    fn prop_row_shape_matches_kind(movements in movements_strategy(30)) {
        let card = apply_all(&movements);

        for entry in card.entries() {
            if entry.kind.is_lot_creating() {
                prop_assert!(entry.incoming_qty > 0);
                prop_assert_eq!(entry.outgoing_qty, 0);
                prop_assert_eq!(entry.cost_of_goods_sold, Decimal::ZERO);
            } else {
                prop_assert!(entry.outgoing_qty > 0);
                prop_assert_eq!(entry.incoming_qty, 0);
                prop_assert_eq!(entry.incoming_unit_cost, Decimal::ZERO);
            }
        }
    }
}

#[cfg(test)]
mod fifo_oracle {
    //! Cross-check the engine against a naive lot-queue simulation.

    use super::*;

    /// Naive FIFO model: a queue of (remaining, unit_cost) lots.
    fn naive_cogs(lots: &mut Vec<(u32, Decimal)>, qty: u32) -> Decimal {
        let mut needed = qty;
        let mut cogs = Decimal::ZERO;
        for (remaining, cost) in lots.iter_mut() {
            if needed == 0 {
                break;
            }
            let take = (*remaining).min(needed);
            cogs += Decimal::from(take) * *cost;
            *remaining -= take;
            needed -= take;
        }
        cogs
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The engine's COGS per sale matches an independent lot-queue model.
        #[test]
        fn prop_cogs_matches_naive_model(
            movements in prop::collection::vec(
                prop_oneof![
                    (date_strategy(), 1u32..=50, unit_cost_strategy())
                        .prop_map(|(date, qty, unit_cost)| Movement::Purchase { date, qty, unit_cost }),
                    (date_strategy(), 1u32..=20).prop_map(|(date, qty)| Movement::Sale { date, qty }),
                ],
                1..=30,
            )
        ) {
            let mut card = StockCard::new();
            let mut lots: Vec<(u32, Decimal)> = Vec::new();

            for movement in &movements {
                match *movement {
                    Movement::Purchase { date, qty, unit_cost } => {
                        card.apply_purchase(date, qty, unit_cost).unwrap();
                        lots.push((qty, unit_cost));
                    }
                    Movement::Sale { date, qty } => {
                        if card.apply_sale(date, qty).is_ok() {
                            let expected = naive_cogs(&mut lots, qty);
                            let sale = card.entries().last().unwrap();
                            prop_assert_eq!(sale.kind, EntryKind::Sale);
                            prop_assert_eq!(sale.cost_of_goods_sold, expected);
                        }
                    }
                    _ => unreachable!("strategy only emits purchases and sales"),
                }
            }
        }
    }
}
