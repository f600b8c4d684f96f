//! Report generation service.

use crate::stockcard::StockCard;

use super::types::StockSummary;

/// Service for aggregating stock card reports.
pub struct ReportService;

impl ReportService {
    /// Computes the aggregate totals for one stock card.
    ///
    /// Consumption counters on lot rows are bookkeeping, not movements, so
    /// only the outgoing quantity of consuming rows counts as outflow.
    #[must_use]
    pub fn summarize(card: &StockCard) -> StockSummary {
        let total_incoming_qty = card
            .entries()
            .iter()
            .map(|e| u64::from(e.incoming_qty))
            .sum();
        let total_outgoing_qty = card
            .entries()
            .iter()
            .map(|e| u64::from(e.outgoing_qty))
            .sum();

        StockSummary {
            total_incoming_qty,
            total_outgoing_qty,
            closing_qty: card.running_qty(),
            closing_value: card.running_value(),
        }
    }
}
