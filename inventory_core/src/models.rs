//! Data model for the two persisted tables.

pub mod equipment;
pub mod movement;

pub use equipment::{Condition, Equipment, EquipmentStatus, NewEquipment};
pub use movement::{Movement, MovementKind, NewMovement};
