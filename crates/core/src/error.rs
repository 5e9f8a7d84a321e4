//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: callers surface it to the user and let them
/// retry. Storage failures are reported by the storage crate, not here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Another item already uses this identifier.
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),

    /// No item with this identifier exists.
    #[error("item not found: {0}")]
    NotFound(String),

    /// A value failed validation (empty, non-numeric, negative, or not positive
    /// where a positive value is required).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stock reduction asked for more units than are on hand.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u64 },
}

impl DomainError {
    pub fn duplicate_id(id: ItemId) -> Self {
        Self::DuplicateId(id)
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn insufficient_stock(requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }
}
