//! In-memory equipment table: lookups, uniqueness checks, suggested codes,
//! and per-code aggregates.
//!
//! The repository is a queryable view over the rows loaded from the snapshot
//! store. Mutation is crate-internal: only the engine inserts or updates
//! rows, so every write goes through the validate → mutate → append → persist
//! cycle.

use indexmap::IndexMap;

use crate::config::InventoryConfig;
use crate::models::equipment::{Condition, Equipment, EquipmentStatus};

/// Insertion-ordered equipment table keyed by row id.
#[derive(Debug, Default)]
pub struct EquipmentRepo {
    rows: IndexMap<u32, Equipment>,
}

/// Read-side filter criteria; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Exact brand match.
    pub brand: Option<String>,
    /// Exact status match.
    pub status: Option<EquipmentStatus>,
    /// Case-insensitive substring match on product code or name.
    pub search: Option<String>,
}

/// Merged reporting view of the New and Used rows sharing one product code.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CodeAggregate {
    /// Units on the New row (0 when absent).
    pub qty_new: u32,
    /// Units on the Used row (0 when absent).
    pub qty_used: u32,
    /// Total units across both rows.
    pub qty_total: u32,
    /// Value held on the New row.
    pub value_new: f64,
    /// Value held on the Used row.
    pub value_used: f64,
    /// Value-weighted average unit price across both rows.
    pub weighted_avg_value: f64,
}

impl EquipmentRepo {
    /// Build a repository from loaded rows. Later duplicates of an id win,
    /// mirroring a last-write-wins read of a hand-edited file.
    pub fn from_rows(rows: Vec<Equipment>) -> Self {
        let mut map = IndexMap::with_capacity(rows.len());
        for row in rows {
            map.insert(row.id, row);
        }
        Self { rows: map }
    }

    /// Number of rows (not units).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.rows.values()
    }

    /// Snapshot of all rows, in insertion order.
    pub fn to_vec(&self) -> Vec<Equipment> {
        self.rows.values().cloned().collect()
    }

    /// Row by id.
    pub fn find_by_id(&self, id: u32) -> Option<&Equipment> {
        self.rows.get(&id)
    }

    /// All rows with this product code: 0, 1, or 2 (one per condition).
    pub fn find_by_code(&self, code: &str) -> Vec<&Equipment> {
        let code = code.trim().to_uppercase();
        self.rows
            .values()
            .filter(|e| e.product_code == code)
            .collect()
    }

    /// The row with this exact `(code, condition)` pair, if any.
    pub fn find_by_code_and_condition(
        &self,
        code: &str,
        condition: Condition,
    ) -> Option<&Equipment> {
        let code = code.trim().to_uppercase();
        self.rows
            .values()
            .find(|e| e.product_code == code && e.condition == condition)
    }

    /// Uniqueness check used before insert; `exclude_id` skips the row being
    /// edited so it does not collide with itself.
    pub fn code_condition_exists(
        &self,
        code: &str,
        condition: Condition,
        exclude_id: Option<u32>,
    ) -> bool {
        let code = code.trim().to_uppercase();
        self.rows.values().any(|e| {
            e.product_code == code
                && e.condition == condition
                && Some(e.id) != exclude_id
        })
    }

    /// Next free id: `max(existing) + 1`, or 1 when the table is empty.
    pub fn next_id(&self) -> u32 {
        self.rows.keys().max().map_or(1, |max| max + 1)
    }

    /// Suggest a code as `{prefix}-{BRAND}-{NNN}` where NNN counts existing
    /// category+brand matches plus one. Advisory only — the user may override
    /// it, so this is never a uniqueness guarantee.
    pub fn suggest_code(&self, category: &str, brand: &str, cfg: &InventoryConfig) -> String {
        let prefix = cfg.prefix_for(category);
        let similar = self
            .rows
            .values()
            .filter(|e| e.category == category && e.brand == brand)
            .count();
        format!("{}-{}-{:03}", prefix, brand.to_uppercase(), similar + 1)
    }

    /// Merge the New and Used rows for a code into one reporting view without
    /// altering storage. All-zero when the code is unknown.
    pub fn aggregate_by_code(&self, code: &str) -> CodeAggregate {
        let mut agg = CodeAggregate::default();
        for row in self.find_by_code(code) {
            match row.condition {
                Condition::New => {
                    agg.qty_new += row.quantity;
                    agg.value_new += row.total_value();
                }
                Condition::Used => {
                    agg.qty_used += row.quantity;
                    agg.value_used += row.total_value();
                }
            }
        }
        agg.qty_total = agg.qty_new + agg.qty_used;
        if agg.qty_total > 0 {
            agg.weighted_avg_value =
                (agg.value_new + agg.value_used) / f64::from(agg.qty_total);
        }
        agg
    }

    /// Rows matching all the given criteria, in insertion order.
    pub fn filter(&self, filter: &EquipmentFilter) -> Vec<&Equipment> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        self.rows
            .values()
            .filter(|e| {
                filter.category.as_ref().is_none_or(|c| &e.category == c)
                    && filter.brand.as_ref().is_none_or(|b| &e.brand == b)
                    && filter.status.is_none_or(|s| e.status == s)
                    && search.as_ref().is_none_or(|q| {
                        e.product_code.to_lowercase().contains(q)
                            || e.name.to_lowercase().contains(q)
                    })
            })
            .collect()
    }

    pub(crate) fn insert(&mut self, row: Equipment) {
        self.rows.insert(row.id, row);
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Equipment> {
        self.rows.get_mut(&id)
    }
}
