//! Durable storage of the equipment and movement tables as one unit.
//!
//! Both tables live in a single JSON document that is read whole on load and
//! rewritten whole on save. There is no partial-write protection: a crash
//! mid-save can corrupt the file or mix old and new table contents. That is
//! an accepted limitation of the design, not a guarantee to preserve.
//!
//! Load is tolerant: an absent or unreadable file yields the built-in seed
//! dataset (written back out), a malformed row is dropped with a warning, and
//! a row missing `condicao` defaults to New. Files written before the
//! `codigo_produto`/`condicao` columns existed are migrated once on load.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::InventoryConfig;
use crate::models::equipment::{Condition, Equipment, EquipmentStatus};
use crate::models::movement::Movement;

/// Share of a legacy row's quantity classified as New during migration.
/// A policy constant, not a business rule; the used remainder is priced at
/// [`LEGACY_USED_VALUE_FACTOR`] of the original unit value.
const LEGACY_NEW_RATIO: f64 = 0.7;
const LEGACY_USED_VALUE_FACTOR: f64 = 0.7;

/// Snapshot-file store for the two tables.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct SnapshotDoc {
    #[serde(rename = "estoque")]
    equipment: Vec<Value>,
    #[serde(rename = "movimentacoes")]
    movements: Vec<Value>,
}

/// One parsed equipment row before migration fix-ups. Rows written by older
/// revisions may lack the code and condition columns.
#[derive(Deserialize)]
struct RawEquipmentRow {
    id: u32,
    #[serde(rename = "equipamento")]
    name: String,
    #[serde(rename = "categoria", default)]
    category: String,
    #[serde(rename = "marca", default)]
    brand: String,
    #[serde(rename = "modelo", default)]
    model: String,
    #[serde(rename = "codigo_produto", default)]
    product_code: Option<String>,
    #[serde(rename = "quantidade")]
    quantity: u32,
    #[serde(rename = "valor_unitario", default)]
    unit_value: f64,
    #[serde(rename = "data_chegada", default)]
    arrival_date: Option<NaiveDate>,
    #[serde(rename = "fornecedor", default)]
    supplier: String,
    #[serde(default)]
    status: Option<EquipmentStatus>,
    #[serde(rename = "condicao", default)]
    condition: Option<Condition>,
}

impl SnapshotStore {
    /// Store backed by the file at `path`; nothing is touched until
    /// [`load`](Self::load) or [`save`](Self::save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read both tables. Falls back to the seed dataset (and writes it out)
    /// when the file is absent or unreadable; migrates legacy rows missing
    /// `codigo_produto` or `condicao` and persists the migrated form.
    pub fn load(&self, cfg: &InventoryConfig) -> (Vec<Equipment>, Vec<Movement>) {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "snapshot file absent, seeding");
                return self.seed();
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "snapshot unreadable, seeding");
                return self.seed();
            }
        };

        let doc: SnapshotDoc = match serde_json::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "snapshot unparsable, seeding");
                return self.seed();
            }
        };

        let mut raw_rows = Vec::with_capacity(doc.equipment.len());
        for value in doc.equipment {
            match serde_json::from_value::<RawEquipmentRow>(value) {
                Ok(row) => raw_rows.push(row),
                Err(e) => warn!(error = %e, "dropping malformed equipment row"),
            }
        }

        let mut movements = Vec::with_capacity(doc.movements.len());
        for value in doc.movements {
            match serde_json::from_value::<Movement>(value) {
                Ok(row) => movements.push(row),
                Err(e) => warn!(error = %e, "dropping malformed movement row"),
            }
        }

        let needs_migration = raw_rows
            .iter()
            .any(|r| r.product_code.is_none() || r.condition.is_none());
        // The condition split is a table-level migration: it runs only when
        // the column predates the file (no row has it). A lone row missing
        // `condicao` in an otherwise-migrated file just defaults to New.
        let legacy_condition_table =
            !raw_rows.is_empty() && raw_rows.iter().all(|r| r.condition.is_none());
        let equipment = finish_rows(raw_rows, cfg, legacy_condition_table);

        if needs_migration {
            info!("migrated legacy snapshot rows, rewriting file");
            self.save(&equipment, &movements);
        }
        (equipment, movements)
    }

    /// Rewrite both tables as one operation. Returns `false` on I/O failure,
    /// logging the cause; never panics or propagates.
    pub fn save(&self, equipment: &[Equipment], movements: &[Movement]) -> bool {
        let doc = SnapshotDoc {
            equipment: equipment
                .iter()
                .filter_map(|e| serde_json::to_value(e).ok())
                .collect(),
            movements: movements
                .iter()
                .filter_map(|m| serde_json::to_value(m).ok())
                .collect(),
        };
        let text = match serde_json::to_string_pretty(&doc) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "failed to serialize snapshot");
                return false;
            }
        };
        match std::fs::write(&self.path, text) {
            Ok(()) => {
                info!(path = %self.path.display(), rows = equipment.len(), movements = movements.len(), "snapshot saved");
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to write snapshot");
                false
            }
        }
    }

    /// Copy the backing file to a timestamped sibling, returning its path.
    /// `None` when the file does not exist or the copy fails.
    pub fn backup(&self) -> Option<PathBuf> {
        if !self.path.exists() {
            return None;
        }
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let name = format!("backup_inventory_{stamp}.json");
        let target = self.path.with_file_name(name);
        match std::fs::copy(&self.path, &target) {
            Ok(_) => {
                info!(path = %target.display(), "backup created");
                Some(target)
            }
            Err(e) => {
                error!(error = %e, "failed to create backup");
                None
            }
        }
    }

    fn seed(&self) -> (Vec<Equipment>, Vec<Movement>) {
        let (equipment, movements) = seed_dataset();
        self.save(&equipment, &movements);
        (equipment, movements)
    }
}

/// Turn tolerant raw rows into final rows: default-fill soft fields and run
/// the one-time legacy migration where columns are missing. The condition
/// split only runs with `split_legacy_condition` set (the whole table
/// predates the column); total quantity is conserved across the split.
fn finish_rows(
    raw_rows: Vec<RawEquipmentRow>,
    cfg: &InventoryConfig,
    split_legacy_condition: bool,
) -> Vec<Equipment> {
    let mut rows = Vec::with_capacity(raw_rows.len());
    let mut split_backlog = Vec::new();

    for (position, raw) in raw_rows.into_iter().enumerate() {
        let product_code = match raw.product_code {
            Some(code) if !code.trim().is_empty() => code.trim().to_uppercase(),
            _ => {
                let code = format!(
                    "{}-{}-{:03}",
                    cfg.prefix_for(&raw.category),
                    raw.brand.to_uppercase(),
                    position + 1
                );
                warn!(id = raw.id, code = %code, "assigned product code to legacy row");
                code
            }
        };
        let status = raw.status.unwrap_or(if raw.quantity == 0 {
            EquipmentStatus::Unavailable
        } else {
            EquipmentStatus::Available
        });
        let arrival_date = raw.arrival_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut row = Equipment {
            id: raw.id,
            name: raw.name,
            category: raw.category,
            brand: raw.brand,
            model: raw.model,
            product_code,
            quantity: raw.quantity,
            unit_value: raw.unit_value,
            arrival_date,
            supplier: raw.supplier,
            status,
            condition: raw.condition.unwrap_or_default(),
        };

        if split_legacy_condition && raw.condition.is_none() && row.quantity > 1 {
            // Legacy split: the New portion stays on this row, the remainder
            // becomes a Used row with the same code at a discounted value.
            let new_qty = ((f64::from(row.quantity)) * LEGACY_NEW_RATIO).round() as u32;
            let new_qty = new_qty.clamp(1, row.quantity);
            let used_qty = row.quantity - new_qty;
            if used_qty > 0 {
                split_backlog.push(Equipment {
                    quantity: used_qty,
                    unit_value: row.unit_value * LEGACY_USED_VALUE_FACTOR,
                    condition: Condition::Used,
                    ..row.clone()
                });
                row.quantity = new_qty;
            }
        }
        rows.push(row);
    }

    let mut next_id = rows.iter().map(|r| r.id).max().map_or(1, |m| m + 1);
    for mut used in split_backlog {
        used.id = next_id;
        next_id += 1;
        rows.push(used);
    }
    rows
}

/// The built-in seed dataset written when no backing file exists yet.
fn seed_dataset() -> (Vec<Equipment>, Vec<Movement>) {
    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap_or_default()
    }
    let eq = |id: u32,
              name: &str,
              category: &str,
              brand: &str,
              model: &str,
              code: &str,
              quantity: u32,
              unit_value: f64,
              arrival: &str,
              supplier: &str| Equipment {
        id,
        name: name.into(),
        category: category.into(),
        brand: brand.into(),
        model: model.into(),
        product_code: code.into(),
        quantity,
        unit_value,
        arrival_date: date(arrival),
        supplier: supplier.into(),
        status: EquipmentStatus::Available,
        condition: Condition::New,
    };

    let equipment = vec![
        eq(1, "Notebook Dell Latitude", "Notebook", "Dell", "Latitude 5520", "NB-DELL-001", 15, 3500.0, "2024-01-15", "Dell Brasil"),
        eq(2, "Monitor LG 24\"", "Monitor", "LG", "24ML600", "MON-LG-002", 25, 800.0, "2024-02-10", "LG Electronics"),
        eq(3, "Impressora HP LaserJet", "Impressora", "HP", "LaserJet Pro", "IMP-HP-003", 8, 1200.0, "2024-01-20", "HP Brasil"),
        eq(4, "Switch Cisco 24P", "Rede", "Cisco", "Catalyst 2960", "SW-CISCO-004", 12, 2500.0, "2024-03-05", "Cisco Systems"),
        eq(5, "Servidor Dell PowerEdge", "Servidor", "Dell", "PowerEdge R740", "SRV-DELL-005", 3, 15000.0, "2024-02-28", "Dell Brasil"),
    ];

    use crate::models::movement::MovementKind;
    let mv = |id: u32,
              equipment_id: u32,
              kind: MovementKind,
              quantity: u32,
              when: &str,
              counterparty: &str,
              notes: &str,
              code: &str| Movement {
        id,
        equipment_id,
        kind,
        quantity,
        date: date(when),
        counterparty: counterparty.into(),
        notes: notes.into(),
        product_code: code.into(),
        condition: Condition::New,
    };

    let movements = vec![
        mv(1, 1, MovementKind::Entry, 15, "2024-01-15", "Supplier: Dell Brasil", "Initial purchase", "NB-DELL-001"),
        mv(2, 2, MovementKind::Exit, 5, "2024-02-15", "Store: Shopping Center", "Transfer to store", "MON-LG-002"),
        mv(3, 3, MovementKind::Entry, 8, "2024-01-20", "Supplier: HP Brasil", "Initial purchase", "IMP-HP-003"),
    ];

    (equipment, movements)
}
