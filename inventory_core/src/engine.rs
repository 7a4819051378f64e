//! The stock mutation engine: add / increase / remove.
//!
//! Each operation is a short validate → mutate repository → append ledger →
//! persist sequence, invoked synchronously by one caller at a time. Every
//! failure — validation, precondition, or persistence — comes back as a
//! structured [`StockResponse`]; nothing propagates as an unhandled fault.
//!
//! Persistence failures do NOT roll back the in-memory mutation: in-memory
//! and on-disk state can diverge until the next successful save. Batch
//! callers get no cross-item atomicity either; a failure partway through a
//! sequence leaves prior successes committed.

use tracing::{error, info};

use crate::config::InventoryConfig;
use crate::error::StockError;
use crate::ledger::MovementLedger;
use crate::models::equipment::{Condition, Equipment, EquipmentStatus, NewEquipment};
use crate::models::movement::{MovementKind, NewMovement};
use crate::repo::EquipmentRepo;
use crate::stats::{self, InventoryStats};
use crate::store::SnapshotStore;

/// Structured result of a mutating operation, shaped for direct rendering.
#[derive(Debug, Clone)]
pub struct StockResponse {
    /// Whether the operation was accepted and applied.
    pub success: bool,
    /// User-facing message (success confirmation or failure reason).
    pub message: String,
    /// The affected equipment row, on success.
    pub equipment: Option<Equipment>,
    /// The row's quantity after the operation, on success.
    pub new_quantity: Option<u32>,
}

impl StockResponse {
    fn ok(message: String, equipment: Equipment) -> Self {
        let new_quantity = Some(equipment.quantity);
        Self {
            success: true,
            message,
            equipment: Some(equipment),
            new_quantity,
        }
    }

    fn fail(err: &StockError) -> Self {
        // Persistence detail goes to the log, not the user.
        let message = match err {
            StockError::Persistence(_) => {
                "Could not save data; please try again".to_string()
            }
            other => other.to_string(),
        };
        Self {
            success: false,
            message,
            equipment: None,
            new_quantity: None,
        }
    }
}

/// Orchestrates the repository, ledger, and snapshot store behind the three
/// mutating operations. Single-writer: callers needing concurrent writers
/// must add their own mutual exclusion around the whole engine.
#[derive(Debug)]
pub struct StockEngine {
    repo: EquipmentRepo,
    ledger: MovementLedger,
    store: SnapshotStore,
    config: InventoryConfig,
}

impl StockEngine {
    /// Load both tables from the store and build an engine over them.
    pub fn open(store: SnapshotStore, config: InventoryConfig) -> Self {
        let (equipment, movements) = store.load(&config);
        Self {
            repo: EquipmentRepo::from_rows(equipment),
            ledger: MovementLedger::from_rows(movements),
            store,
            config,
        }
    }

    /// Re-read both tables from the store, discarding in-memory state.
    pub fn reload(&mut self) {
        let (equipment, movements) = self.store.load(&self.config);
        self.repo = EquipmentRepo::from_rows(equipment);
        self.ledger = MovementLedger::from_rows(movements);
    }

    /// Read-only view of the equipment table.
    pub fn repo(&self) -> &EquipmentRepo {
        &self.repo
    }

    /// Read-only view of the movement ledger.
    pub fn ledger(&self) -> &MovementLedger {
        &self.ledger
    }

    /// The injected constants this engine runs with.
    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// The snapshot store backing this engine.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Summary metrics over the current equipment table.
    pub fn stats(&self) -> InventoryStats {
        stats::inventory_stats(&self.repo)
    }

    /// Add a new equipment row with an initial-entry movement.
    pub fn add_equipment(&mut self, input: NewEquipment) -> StockResponse {
        match self.try_add(input) {
            Ok(row) => {
                info!(code = %row.product_code, condition = %row.condition, "equipment added");
                StockResponse::ok(
                    format!("Equipment '{}' added successfully", row.name),
                    row,
                )
            }
            Err(err) => {
                error!(error = %err, "add_equipment failed");
                StockResponse::fail(&err)
            }
        }
    }

    /// Increase the stock of an existing row, overwriting its unit value and
    /// supplier with the new purchase's figures.
    pub fn increase_stock(
        &mut self,
        equipment_id: u32,
        quantity: u32,
        unit_value: f64,
        supplier: &str,
        condition: Option<Condition>,
    ) -> StockResponse {
        match self.try_increase(equipment_id, quantity, unit_value, supplier, condition) {
            Ok(row) => {
                info!(code = %row.product_code, quantity, "stock increased");
                StockResponse::ok(
                    format!("Stock increased; new quantity: {}", row.quantity),
                    row,
                )
            }
            Err(err) => {
                error!(error = %err, equipment_id, "increase_stock failed");
                StockResponse::fail(&err)
            }
        }
    }

    /// Remove units from an existing row; drives the status to Unavailable
    /// when the row is depleted.
    pub fn remove_stock(
        &mut self,
        equipment_id: u32,
        quantity: u32,
        destination: &str,
        notes: &str,
        condition: Option<Condition>,
    ) -> StockResponse {
        match self.try_remove(equipment_id, quantity, destination, notes, condition) {
            Ok(row) => {
                info!(code = %row.product_code, quantity, "stock removed");
                StockResponse::ok(
                    format!("Removed {} unit(s); new quantity: {}", quantity, row.quantity),
                    row,
                )
            }
            Err(err) => {
                error!(error = %err, equipment_id, "remove_stock failed");
                StockResponse::fail(&err)
            }
        }
    }

    fn try_add(&mut self, input: NewEquipment) -> Result<Equipment, StockError> {
        let clean = input.sanitized(&self.config)?;

        if self
            .repo
            .code_condition_exists(&clean.product_code, clean.condition, None)
        {
            return Err(StockError::DuplicateCode {
                code: clean.product_code,
                condition: clean.condition,
            });
        }

        let row = Equipment {
            id: self.repo.next_id(),
            name: clean.name,
            category: clean.category,
            brand: clean.brand,
            model: clean.model,
            product_code: clean.product_code,
            quantity: clean.quantity,
            unit_value: clean.unit_value,
            arrival_date: clean
                .arrival_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
            supplier: clean.supplier,
            status: EquipmentStatus::Available,
            condition: clean.condition,
        };
        self.repo.insert(row.clone());

        self.ledger.append(NewMovement {
            equipment_id: row.id,
            kind: MovementKind::Entry,
            quantity: row.quantity,
            date: None,
            counterparty: format!("Supplier: {}", row.supplier),
            notes: format!(
                "Initial stock entry | Code: {} ({})",
                row.product_code, row.condition
            ),
            product_code: row.product_code.clone(),
            condition: row.condition,
        })?;

        self.persist()?;
        Ok(row)
    }

    fn try_increase(
        &mut self,
        equipment_id: u32,
        quantity: u32,
        unit_value: f64,
        supplier: &str,
        condition: Option<Condition>,
    ) -> Result<Equipment, StockError> {
        let mut problems = Vec::new();
        if quantity == 0 {
            problems.push("quantity must be positive".to_string());
        }
        let supplier = supplier.trim();
        if supplier.is_empty() {
            problems.push("supplier is required".to_string());
        }
        if unit_value < self.config.min_unit_value {
            problems.push(format!(
                "unit value must be at least {:.2}",
                self.config.min_unit_value
            ));
        }
        if !problems.is_empty() {
            return Err(StockError::Validation(problems));
        }

        let id = self.resolve_target(equipment_id, condition)?;
        let limit = self.config.max_quantity;
        let row = self.repo.get_mut(id).ok_or(StockError::NotFound)?;

        let new_quantity = row
            .quantity
            .checked_add(quantity)
            .filter(|q| *q <= limit)
            .ok_or(StockError::LimitExceeded { limit })?;

        row.quantity = new_quantity;
        row.unit_value = unit_value;
        row.supplier = supplier.to_string();
        row.status = EquipmentStatus::Available;
        let row = row.clone();

        self.ledger.append(NewMovement {
            equipment_id: row.id,
            kind: MovementKind::Entry,
            quantity,
            date: None,
            counterparty: format!("Supplier: {}", row.supplier),
            notes: format!(
                "Stock increase | Code: {} ({})",
                row.product_code, row.condition
            ),
            product_code: row.product_code.clone(),
            condition: row.condition,
        })?;

        self.persist()?;
        Ok(row)
    }

    fn try_remove(
        &mut self,
        equipment_id: u32,
        quantity: u32,
        destination: &str,
        notes: &str,
        condition: Option<Condition>,
    ) -> Result<Equipment, StockError> {
        let mut problems = Vec::new();
        if quantity == 0 {
            problems.push("quantity must be positive".to_string());
        }
        let destination = destination.trim();
        if destination.is_empty() {
            problems.push("destination is required".to_string());
        }
        if notes.chars().count() > self.config.max_notes_len {
            problems.push(format!(
                "notes cannot exceed {} characters",
                self.config.max_notes_len
            ));
        }
        if !problems.is_empty() {
            return Err(StockError::Validation(problems));
        }

        let id = self.resolve_target(equipment_id, condition)?;
        let row = self.repo.get_mut(id).ok_or(StockError::NotFound)?;

        if quantity > row.quantity {
            return Err(StockError::InsufficientStock {
                available: row.quantity,
            });
        }

        row.quantity -= quantity;
        if row.quantity == 0 {
            row.status = EquipmentStatus::Unavailable;
        }
        let row = row.clone();

        let notes = notes.trim();
        let enriched = if notes.is_empty() {
            format!("Code: {} ({})", row.product_code, row.condition)
        } else {
            format!("{} | Code: {} ({})", notes, row.product_code, row.condition)
        };

        self.ledger.append(NewMovement {
            equipment_id: row.id,
            kind: MovementKind::Exit,
            quantity,
            date: None,
            counterparty: destination.to_string(),
            notes: enriched,
            product_code: row.product_code.clone(),
            condition: row.condition,
        })?;

        self.persist()?;
        Ok(row)
    }

    /// Resolve the row an operation targets. A condition hint re-resolves by
    /// `(product_code, hint)` so callers holding the code's other-condition
    /// sibling still reach the exact row they asked for.
    fn resolve_target(
        &self,
        equipment_id: u32,
        condition: Option<Condition>,
    ) -> Result<u32, StockError> {
        let row = self.repo.find_by_id(equipment_id).ok_or(StockError::NotFound)?;
        match condition {
            None => Ok(row.id),
            Some(cond) if cond == row.condition => Ok(row.id),
            Some(cond) => self
                .repo
                .find_by_code_and_condition(&row.product_code, cond)
                .map(|r| r.id)
                .ok_or(StockError::NotFound),
        }
    }

    fn persist(&mut self) -> Result<(), StockError> {
        let equipment = self.repo.to_vec();
        if self.store.save(&equipment, self.ledger.entries()) {
            Ok(())
        } else {
            Err(StockError::Persistence(format!(
                "failed to write snapshot {}",
                self.store.path().display()
            )))
        }
    }
}
