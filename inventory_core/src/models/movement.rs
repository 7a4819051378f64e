//! Movement ledger rows.
//!
//! Every stock-affecting operation appends exactly one movement. Quantity is
//! always positive; direction is carried by [`MovementKind`], not by sign.
//! `product_code` and `condition` are denormalized copies of the equipment's
//! values at the time of the movement so entries stay interpretable even if
//! the equipment row is later altered.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    /// Stock coming in (purchase, initial add, restock).
    #[serde(rename = "Entrada")]
    Entry,
    /// Stock going out (shipment, transfer).
    #[serde(rename = "Saída")]
    Exit,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "Entry"),
            MovementKind::Exit => write!(f, "Exit"),
        }
    }
}

/// An immutable row in the movement ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Unique id, monotonically assigned.
    pub id: u32,
    /// The equipment row this movement touched. Not enforced referentially:
    /// the entry survives even if the row's other attributes change.
    #[serde(rename = "equipamento_id")]
    pub equipment_id: u32,
    /// Entry or exit.
    #[serde(rename = "tipo_movimentacao")]
    pub kind: MovementKind,
    /// Units moved; always positive.
    #[serde(rename = "quantidade")]
    pub quantity: u32,
    /// Date of the movement.
    #[serde(rename = "data_movimentacao")]
    pub date: NaiveDate,
    /// Destination (exit) or origin (entry), e.g. "Supplier: Dell Brasil".
    #[serde(rename = "destino_origem")]
    pub counterparty: String,
    /// Free-text notes, enriched with code and condition for audit reads.
    #[serde(rename = "observacoes", default)]
    pub notes: String,
    /// Product code of the equipment at the time of the movement.
    #[serde(rename = "codigo_produto", default)]
    pub product_code: String,
    /// Condition of the equipment at the time of the movement.
    #[serde(rename = "condicao", default)]
    pub condition: super::equipment::Condition,
}

/// Input form for appending a [`Movement`]; the ledger assigns the id.
#[derive(Debug, Clone)]
pub struct NewMovement {
    /// Target equipment id.
    pub equipment_id: u32,
    /// Entry or exit.
    pub kind: MovementKind,
    /// Units moved; must be positive.
    pub quantity: u32,
    /// Date of the movement; `None` means today.
    pub date: Option<NaiveDate>,
    /// Destination or origin; required.
    pub counterparty: String,
    /// Free-text notes.
    pub notes: String,
    /// Denormalized product code.
    pub product_code: String,
    /// Denormalized condition.
    pub condition: super::equipment::Condition,
}
