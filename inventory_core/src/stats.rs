//! Read-side summary metrics over the equipment table.
//!
//! Pure projections: no mutation, no caching, and an empty repository yields
//! all-zero stats rather than an error. Callers that want caching impose it
//! themselves.

use std::collections::HashSet;

use crate::models::equipment::{Condition, EquipmentStatus};
use crate::repo::EquipmentRepo;

/// Aggregate metrics for the whole inventory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryStats {
    /// Units across all rows.
    pub total_units: u64,
    /// Sum of `quantity * unit_value` across all rows.
    pub total_value: f64,
    /// Distinct categories present.
    pub distinct_categories: usize,
    /// Distinct brands present.
    pub distinct_brands: usize,
    /// Units on rows whose status is Available.
    pub available_units: u64,
    /// Number of equipment rows (not units).
    pub equipment_rows: usize,
    /// Number of rows in Maintenance status.
    pub maintenance_rows: usize,
    /// New/Used breakdown.
    pub condition: ConditionSplit,
}

/// New-versus-Used breakdown of units and value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionSplit {
    /// Units on New rows.
    pub new_units: u64,
    /// Units on Used rows.
    pub used_units: u64,
    /// Value held on New rows.
    pub new_value: f64,
    /// Value held on Used rows.
    pub used_value: f64,
    /// Share of units that are New, in percent (0 when empty).
    pub new_pct: f64,
    /// Share of units that are Used, in percent (0 when empty).
    pub used_pct: f64,
}

/// Compute summary metrics over the repository.
pub fn inventory_stats(repo: &EquipmentRepo) -> InventoryStats {
    let mut stats = InventoryStats::default();
    let mut categories = HashSet::new();
    let mut brands = HashSet::new();

    for row in repo.iter() {
        let units = u64::from(row.quantity);
        stats.total_units += units;
        stats.total_value += row.total_value();
        categories.insert(row.category.as_str());
        brands.insert(row.brand.as_str());
        stats.equipment_rows += 1;

        match row.status {
            EquipmentStatus::Available => stats.available_units += units,
            EquipmentStatus::Maintenance => stats.maintenance_rows += 1,
            EquipmentStatus::Unavailable => {}
        }

        match row.condition {
            Condition::New => {
                stats.condition.new_units += units;
                stats.condition.new_value += row.total_value();
            }
            Condition::Used => {
                stats.condition.used_units += units;
                stats.condition.used_value += row.total_value();
            }
        }
    }

    stats.distinct_categories = categories.len();
    stats.distinct_brands = brands.len();
    if stats.total_units > 0 {
        let total = stats.total_units as f64;
        stats.condition.new_pct = stats.condition.new_units as f64 / total * 100.0;
        stats.condition.used_pct = stats.condition.used_units as f64 / total * 100.0;
    }
    stats
}
