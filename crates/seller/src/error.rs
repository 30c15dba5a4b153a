//! Seller error types.

use common::OrderId;
use inventory::InventoryError;
use thiserror::Error;

/// Errors that can occur during seller operations.
///
/// Items the system cannot fulfill are a business outcome expressed in the
/// item/order statuses; these variants signal logic errors.
#[derive(Debug, Error)]
pub enum SellerError {
    /// No customer order exists with the given ID.
    #[error("Customer order not found: {0}")]
    OrderNotFound(OrderId),

    /// A customer order needs at least one item.
    #[error("Customer order has no items")]
    NoItems,

    /// Ledger operation failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Convenience type alias for seller results.
pub type Result<T> = std::result::Result<T, SellerError>;
