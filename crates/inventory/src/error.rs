//! Inventory error types.

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Note that a failed reservation is *not* an error: `reserve` reports
/// insufficient availability as a plain `false`, because running out of
/// stock is a normal business outcome. The variants here signal logic
/// errors (releasing more than was reserved) or genuine failures
/// (consuming stock that was never there).
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No ledger record exists for the product.
    #[error("No inventory record for product {0}")]
    ProductNotFound(ProductId),

    /// On-hand availability does not cover the requested quantity.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: u32,
        requested: u32,
    },

    /// Reserved quantity does not cover the requested release/consumption.
    #[error("Insufficient reservation for product {product_id}: reserved {reserved}, requested {requested}")]
    InsufficientReserved {
        product_id: ProductId,
        reserved: u32,
        requested: u32,
    },

    /// Setting on-hand below the currently reserved quantity would break
    /// the `reserved <= on_hand` invariant.
    #[error("Cannot set on-hand to {on_hand} for product {product_id}: {reserved} units are reserved")]
    ReservedExceedsOnHand {
        product_id: ProductId,
        on_hand: u32,
        reserved: u32,
    },
}

/// Convenience type alias for inventory results.
pub type Result<T> = std::result::Result<T, InventoryError>;
