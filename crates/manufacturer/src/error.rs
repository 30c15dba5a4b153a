//! Manufacturer error types.

use common::{OrderId, ProductId};
use inventory::InventoryError;
use thiserror::Error;

use crate::order::ProductionOrderStatus;

/// Errors that can occur during manufacturer operations.
#[derive(Debug, Error)]
pub enum ManufacturerError {
    /// No production order exists with the given ID.
    #[error("Production order not found: {0}")]
    OrderNotFound(OrderId),

    /// The production order is not in the required lifecycle state.
    /// Carries the observed state so the caller can decide what to do next.
    #[error("Cannot {action} production order in {current} state")]
    InvalidState {
        current: ProductionOrderStatus,
        action: &'static str,
    },

    /// Shipment quantity is zero or exceeds the order quantity.
    #[error("Invalid shipment quantity {quantity} (order is for {ordered})")]
    InvalidQuantity { quantity: u32, ordered: u32 },

    /// The product has no active production capacity record. Distinct from
    /// infeasibility: an unconfigured product cannot even be planned.
    #[error("No active production capacity configured for product {0}")]
    CapacityNotConfigured(ProductId),

    /// Ledger operation failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Convenience type alias for manufacturer results.
pub type Result<T> = std::result::Result<T, ManufacturerError>;
