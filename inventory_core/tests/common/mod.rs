#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use inventory_core::config::InventoryConfig;
use inventory_core::engine::StockEngine;
use inventory_core::models::equipment::{Condition, NewEquipment};
use inventory_core::store::SnapshotStore;

pub struct TestStore {
    _dir: TempDir, // keep alive for the life of the test
    pub path: PathBuf,
}

/// Engine over an explicitly empty snapshot file (no seed rows).
pub fn blank_engine() -> (TestStore, StockEngine) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("inventory.json");
    std::fs::write(&path, r#"{"estoque": [], "movimentacoes": []}"#).expect("write empty doc");

    let engine = StockEngine::open(SnapshotStore::new(&path), InventoryConfig::default());
    (TestStore { _dir: dir, path }, engine)
}

/// Engine over a missing file: open seeds the built-in dataset.
pub fn seeded_engine() -> (TestStore, StockEngine) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("inventory.json");
    let engine = StockEngine::open(SnapshotStore::new(&path), InventoryConfig::default());
    (TestStore { _dir: dir, path }, engine)
}

pub fn new_equipment(code: &str, condition: Condition, qty: u32, value: f64) -> NewEquipment {
    NewEquipment {
        name: format!("Equipment {code}"),
        category: "Notebook".into(),
        brand: "Dell".into(),
        model: "Latitude 5520".into(),
        product_code: code.into(),
        quantity: qty,
        unit_value: value,
        supplier: "Dell Brasil".into(),
        condition,
        arrival_date: None,
    }
}
