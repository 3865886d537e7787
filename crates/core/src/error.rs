//! Ledger error model.

use thiserror::Error;

use crate::id::{ProductId, WarehouseId};

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Keep this focused on deterministic business failures. Every failure is
/// surfaced to the caller as a typed result, never as a silent no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or incomplete input (e.g. empty order items). Rejected before
    /// any side effect.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A deduction would drive a quantity negative. No partial effect occurs.
    #[error(
        "insufficient stock for product {product_id} at warehouse {warehouse_id}: \
         requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        warehouse_id: WarehouseId,
        requested: i64,
        available: i64,
    },

    /// Operation attempted from a state that doesn't permit it (e.g. shipping
    /// a backordered order). No state change occurs.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Goods receipt could not resolve a warehouse for a product. Rejected for
    /// that line only.
    #[error("no destination warehouse for product {0}")]
    NoDestinationWarehouse(ProductId),

    /// Underlying storage failure (e.g. poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn insufficient_stock(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            product_id,
            warehouse_id,
            requested,
            available,
        }
    }
}
