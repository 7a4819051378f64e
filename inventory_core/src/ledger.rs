//! Append-only log of stock-affecting events.
//!
//! Entries are immutable once written: there is no update or delete path, and
//! the public surface only hands out shared references. A missing required
//! field on append is caller programming error and comes back as a
//! validation failure rather than a panic.

use chrono::{NaiveDate, Utc};
use tracing::{error, info};

use crate::error::StockError;
use crate::models::movement::{Movement, MovementKind, NewMovement};

/// The append-only movement table.
#[derive(Debug, Default)]
pub struct MovementLedger {
    entries: Vec<Movement>,
}

/// Read-side filter criteria; `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementFilter {
    /// Entry or exit.
    pub kind: Option<MovementKind>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Restrict to one equipment row.
    pub equipment_id: Option<u32>,
}

/// Entry/exit totals over a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementWindowStats {
    /// Number of entry movements in the window.
    pub entries: usize,
    /// Number of exit movements in the window.
    pub exits: usize,
    /// Total movements in the window.
    pub total: usize,
    /// Units received across entry movements.
    pub units_in: u64,
    /// Units shipped across exit movements.
    pub units_out: u64,
}

impl MovementLedger {
    /// Build a ledger from loaded rows, keeping file order.
    pub fn from_rows(rows: Vec<Movement>) -> Self {
        Self { entries: rows }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Movement] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate, assign the next id, and append. Never mutates or removes
    /// prior entries; on failure nothing is appended.
    pub fn append(&mut self, input: NewMovement) -> Result<Movement, StockError> {
        let mut problems = Vec::new();
        if input.quantity == 0 {
            problems.push("movement quantity must be positive".to_string());
        }
        if input.counterparty.trim().is_empty() {
            problems.push("counterparty is required".to_string());
        }
        if input.product_code.trim().is_empty() {
            problems.push("product code is required".to_string());
        }
        if !problems.is_empty() {
            error!(?problems, "rejected movement append");
            return Err(StockError::Validation(problems));
        }

        let id = self.entries.iter().map(|m| m.id).max().map_or(1, |m| m + 1);
        let movement = Movement {
            id,
            equipment_id: input.equipment_id,
            kind: input.kind,
            quantity: input.quantity,
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
            counterparty: input.counterparty.trim().to_string(),
            notes: input.notes,
            product_code: input.product_code.trim().to_uppercase(),
            condition: input.condition,
        };
        info!(
            kind = %movement.kind,
            quantity = movement.quantity,
            code = %movement.product_code,
            "movement recorded"
        );
        self.entries.push(movement.clone());
        Ok(movement)
    }

    /// Entries matching all the given criteria, in insertion order.
    pub fn query(&self, filter: &MovementFilter) -> Vec<&Movement> {
        self.entries
            .iter()
            .filter(|m| {
                filter.kind.is_none_or(|k| m.kind == k)
                    && filter.from.is_none_or(|d| m.date >= d)
                    && filter.to.is_none_or(|d| m.date <= d)
                    && filter.equipment_id.is_none_or(|id| m.equipment_id == id)
            })
            .collect()
    }

    /// Entries for one equipment row, in insertion order.
    pub fn for_equipment(&self, equipment_id: u32) -> Vec<&Movement> {
        self.query(&MovementFilter {
            equipment_id: Some(equipment_id),
            ..Default::default()
        })
    }

    /// The most recent `n` entries by date, ties broken by insertion order,
    /// both descending.
    pub fn recent(&self, n: usize) -> Vec<&Movement> {
        let mut sorted: Vec<(usize, &Movement)> = self.entries.iter().enumerate().collect();
        sorted.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
        sorted.into_iter().take(n).map(|(_, m)| m).collect()
    }

    /// Entry/exit totals over the `days` days ending at `today` (inclusive).
    /// All-zero on an empty ledger.
    pub fn window_stats(&self, today: NaiveDate, days: u32) -> MovementWindowStats {
        let cutoff = today - chrono::Days::new(u64::from(days));
        let mut stats = MovementWindowStats::default();
        for m in self.entries.iter().filter(|m| m.date >= cutoff) {
            stats.total += 1;
            match m.kind {
                MovementKind::Entry => {
                    stats.entries += 1;
                    stats.units_in += u64::from(m.quantity);
                }
                MovementKind::Exit => {
                    stats.exits += 1;
                    stats.units_out += u64::from(m.quantity);
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::equipment::Condition;

    fn mv(equipment_id: u32, kind: MovementKind, qty: u32, date: &str) -> NewMovement {
        NewMovement {
            equipment_id,
            kind,
            quantity: qty,
            date: Some(date.parse().unwrap()),
            counterparty: "Supplier: Dell Brasil".into(),
            notes: String::new(),
            product_code: "NB-DELL-001".into(),
            condition: Condition::New,
        }
    }

    fn ledger() -> MovementLedger {
        let mut l = MovementLedger::default();
        l.append(mv(1, MovementKind::Entry, 15, "2024-01-15")).unwrap();
        l.append(mv(1, MovementKind::Exit, 5, "2024-02-15")).unwrap();
        l.append(mv(2, MovementKind::Entry, 8, "2024-02-15")).unwrap();
        l
    }

    #[test]
    fn append_assigns_monotonic_ids() {
        let l = ledger();
        let ids: Vec<u32> = l.entries().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn append_rejects_missing_fields_without_appending() {
        let mut l = ledger();
        let before = l.len();
        let mut bad = mv(1, MovementKind::Entry, 0, "2024-03-01");
        bad.counterparty = "  ".into();
        let err = l.append(bad).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
        assert_eq!(l.len(), before);
    }

    #[test]
    fn query_filters_compose() {
        let l = ledger();
        let hits = l.query(&MovementFilter {
            kind: Some(MovementKind::Entry),
            from: Some("2024-02-01".parse().unwrap()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].equipment_id, 2);
        assert_eq!(l.for_equipment(1).len(), 2);
    }

    #[test]
    fn recent_breaks_date_ties_by_insertion_order_descending() {
        let l = ledger();
        let recent: Vec<u32> = l.recent(3).iter().map(|m| m.id).collect();
        // ids 2 and 3 share a date; the later insertion wins the tie
        assert_eq!(recent, vec![3, 2, 1]);
    }

    #[test]
    fn window_stats_sum_units_by_kind() {
        let l = ledger();
        let stats = l.window_stats("2024-02-20".parse().unwrap(), 30);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.exits, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.units_in, 8);
        assert_eq!(stats.units_out, 5);
    }

    #[test]
    fn window_stats_on_empty_ledger_is_zero() {
        let l = MovementLedger::default();
        assert_eq!(
            l.window_stats("2024-01-01".parse().unwrap(), 30),
            MovementWindowStats::default()
        );
    }
}
