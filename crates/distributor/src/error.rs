//! Distributor error types.

use common::OrderId;
use inventory::InventoryError;
use thiserror::Error;

/// Errors that can occur during distributor operations.
///
/// Business-negative outcomes (out of stock, infeasible capacity,
/// manufacturer unreachable) are encoded in the response types, not here;
/// these variants signal logic errors and broken invariants.
#[derive(Debug, Error)]
pub enum DistributorError {
    /// No distributor order exists with the given ID.
    #[error("Distributor order not found: {0}")]
    OrderNotFound(OrderId),

    /// Ledger operation failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Convenience type alias for distributor results.
pub type Result<T> = std::result::Result<T, DistributorError>;
