//! Equipment rows and their closed status/condition tags.
//!
//! Wire names follow the backing-file layout (`equipamento`, `quantidade`,
//! `Disponível`, `Novo`, …) via serde renames; the in-code API is English.
//! The same logical product in mixed condition is modeled as two rows sharing
//! one `product_code`, so `(product_code, condition)` is the unique key, not
//! the code alone.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::InventoryConfig;
use crate::error::StockError;

/// Availability tag on an equipment row.
///
/// Set to [`Unavailable`](Self::Unavailable) automatically when a removal
/// drives the quantity to 0; any increase sets it back to
/// [`Available`](Self::Available). [`Maintenance`](Self::Maintenance) is a
/// manual-only state, never produced by the mutation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    /// In stock and usable.
    #[serde(rename = "Disponível")]
    Available,
    /// Fully depleted (quantity 0).
    #[serde(rename = "Indisponível")]
    Unavailable,
    /// Pulled for maintenance (set outside the mutation engine).
    #[serde(rename = "Manutenção")]
    Maintenance,
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentStatus::Available => write!(f, "Available"),
            EquipmentStatus::Unavailable => write!(f, "Unavailable"),
            EquipmentStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

/// Condition tag, fixed at row creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Factory-new stock.
    #[default]
    #[serde(rename = "Novo")]
    New,
    /// Second-hand stock.
    #[serde(rename = "Usado")]
    Used,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::New => write!(f, "New"),
            Condition::Used => write!(f, "Used"),
        }
    }
}

/// A row in the equipment table.
///
/// Rows are created by "add", mutated in place by "increase"/"remove", and
/// never hard-deleted: a fully depleted row persists with quantity 0 and
/// status [`EquipmentStatus::Unavailable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Unique id, assigned as `max(existing) + 1`; never reused.
    pub id: u32,
    /// Equipment description (e.g., "Notebook Dell Latitude").
    #[serde(rename = "equipamento")]
    pub name: String,
    /// Category (e.g., "Notebook", "Monitor").
    #[serde(rename = "categoria")]
    pub category: String,
    /// Brand (e.g., "Dell").
    #[serde(rename = "marca")]
    pub brand: String,
    /// Model (e.g., "Latitude 5520").
    #[serde(rename = "modelo")]
    pub model: String,
    /// Product code, 2–20 chars, uppercased; unique per `(code, condition)`.
    #[serde(rename = "codigo_produto")]
    pub product_code: String,
    /// Units on hand, `0..=max_quantity`.
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    /// Price per unit; the latest purchase price replaces the old one.
    #[serde(rename = "valor_unitario")]
    pub unit_value: f64,
    /// Date the row was created; not updated by increase/remove.
    #[serde(rename = "data_chegada")]
    pub arrival_date: NaiveDate,
    /// Most recent supplier.
    #[serde(rename = "fornecedor")]
    pub supplier: String,
    /// Availability tag, derived from mutations.
    pub status: EquipmentStatus,
    /// Condition tag, fixed at creation.
    #[serde(rename = "condicao", default)]
    pub condition: Condition,
}

impl Equipment {
    /// Total value held on this row (`quantity * unit_value`).
    pub fn total_value(&self) -> f64 {
        f64::from(self.quantity) * self.unit_value
    }
}

/// Validated input form for creating an [`Equipment`] row.
///
/// [`Self::sanitized`] trims free text, uppercases the product code, and
/// collects every field-level problem into one
/// [`StockError::Validation`] so the caller can render the full list.
#[derive(Debug, Clone)]
pub struct NewEquipment {
    /// Equipment description.
    pub name: String,
    /// Category.
    pub category: String,
    /// Brand.
    pub brand: String,
    /// Model.
    pub model: String,
    /// Product code (will be trimmed and uppercased).
    pub product_code: String,
    /// Initial quantity, `1..=max_quantity`.
    pub quantity: u32,
    /// Price per unit, at least `min_unit_value`.
    pub unit_value: f64,
    /// Supplier name.
    pub supplier: String,
    /// Condition of the new row.
    pub condition: Condition,
    /// Arrival date; `None` means today.
    pub arrival_date: Option<NaiveDate>,
}

const MAX_NAME_LEN: usize = 100;
const MAX_BRAND_LEN: usize = 50;
const MAX_MODEL_LEN: usize = 50;
const MAX_SUPPLIER_LEN: usize = 100;
const MIN_CODE_LEN: usize = 2;
const MAX_CODE_LEN: usize = 20;

impl NewEquipment {
    /// Return a cleaned copy, or every field-level problem found.
    pub fn sanitized(&self, cfg: &InventoryConfig) -> Result<NewEquipment, StockError> {
        let mut problems = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            problems.push("name is required".to_string());
        } else if name.chars().count() > MAX_NAME_LEN {
            problems.push(format!("name cannot exceed {MAX_NAME_LEN} characters"));
        }

        let category = self.category.trim().to_string();
        if category.is_empty() {
            problems.push("category is required".to_string());
        }

        let brand = self.brand.trim().to_string();
        if brand.is_empty() {
            problems.push("brand is required".to_string());
        } else if brand.chars().count() > MAX_BRAND_LEN {
            problems.push(format!("brand cannot exceed {MAX_BRAND_LEN} characters"));
        }

        let model = self.model.trim().to_string();
        if model.is_empty() {
            problems.push("model is required".to_string());
        } else if model.chars().count() > MAX_MODEL_LEN {
            problems.push(format!("model cannot exceed {MAX_MODEL_LEN} characters"));
        }

        let supplier = self.supplier.trim().to_string();
        if supplier.is_empty() {
            problems.push("supplier is required".to_string());
        } else if supplier.chars().count() > MAX_SUPPLIER_LEN {
            problems.push(format!(
                "supplier cannot exceed {MAX_SUPPLIER_LEN} characters"
            ));
        }

        let product_code = self.product_code.trim().to_uppercase();
        let code_len = product_code.chars().count();
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code_len) {
            problems.push(format!(
                "product code must be {MIN_CODE_LEN}-{MAX_CODE_LEN} characters"
            ));
        }

        if self.quantity == 0 {
            problems.push("quantity must be at least 1".to_string());
        } else if self.quantity > cfg.max_quantity {
            problems.push(format!("quantity cannot exceed {}", cfg.max_quantity));
        }

        if self.unit_value < cfg.min_unit_value {
            problems.push(format!(
                "unit value must be at least {:.2}",
                cfg.min_unit_value
            ));
        }

        if !problems.is_empty() {
            return Err(StockError::Validation(problems));
        }

        Ok(NewEquipment {
            name,
            category,
            brand,
            model,
            product_code,
            quantity: self.quantity,
            unit_value: self.unit_value,
            supplier,
            condition: self.condition,
            arrival_date: self.arrival_date,
        })
    }
}
