//! Error taxonomy for stock mutations.

use thiserror::Error;

use crate::models::equipment::Condition;

/// The unified error type for stock mutations.
///
/// Every variant is surfaced to callers as a structured failure response at
/// the engine boundary; nothing here propagates as a panic or an unhandled
/// fault to the UI layer.
#[derive(Debug, Error)]
pub enum StockError {
    /// Malformed or missing input; carries one message per offending field.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A `(product_code, condition)` pair already exists in the repository.
    #[error("code '{code}' already exists as {condition}")]
    DuplicateCode {
        /// The colliding product code (uppercased).
        code: String,
        /// The condition under which the code is already registered.
        condition: Condition,
    },

    /// The referenced equipment id or `(code, condition)` pair does not exist.
    #[error("equipment not found")]
    NotFound,

    /// A removal asked for more units than the row holds.
    #[error("insufficient stock: {available} unit(s) available")]
    InsufficientStock {
        /// Units actually available on the targeted row.
        available: u32,
    },

    /// An increase would push the row past the configured quantity ceiling.
    #[error("total quantity would exceed the limit of {limit}")]
    LimitExceeded {
        /// The configured `max_quantity`.
        limit: u32,
    },

    /// The backing store could not be read or written.
    #[error("persistence failure: {0}")]
    Persistence(String),
}
