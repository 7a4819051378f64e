//! Stock-mutation and movement-ledger core for an IT-equipment inventory.
//!
//! Two related tables — equipment rows and an append-only movement ledger —
//! live in a single JSON snapshot file that is read on open and rewritten
//! wholesale after every accepted mutation. [`engine::StockEngine`] is the
//! single write path; reads go straight to [`repo::EquipmentRepo`],
//! [`ledger::MovementLedger`] and [`stats`].
//!
//! Single-writer by design: there is no locking, no conflict detection and no
//! partial-write protection. Callers that need concurrent writers must wrap
//! the engine in their own mutual exclusion.

#![deny(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repo;
pub mod stats;
pub mod store;
