//! Per-product inventory record.

use chrono::{DateTime, Utc};
use common::ProductId;
use serde::{Deserialize, Serialize};

/// A single product's position in one service's ledger.
///
/// Fields are private: mutation happens only through the ledger operations,
/// which maintain the invariant `reserved <= on_hand` and stamp
/// `updated_at` on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    product_id: ProductId,
    quantity_on_hand: u32,
    quantity_reserved: u32,
    updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    pub(crate) fn new(product_id: ProductId, quantity_on_hand: u32) -> Self {
        Self {
            product_id,
            quantity_on_hand,
            quantity_reserved: 0,
            updated_at: Utc::now(),
        }
    }

    /// Returns the product this record tracks.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the physically present quantity.
    pub fn quantity_on_hand(&self) -> u32 {
        self.quantity_on_hand
    }

    /// Returns the quantity held by reservations.
    pub fn quantity_reserved(&self) -> u32 {
        self.quantity_reserved
    }

    /// Returns the quantity free for new reservations (derived, never stored).
    pub fn available(&self) -> u32 {
        self.quantity_on_hand - self.quantity_reserved
    }

    /// Returns when the record was last mutated. Observability only;
    /// business logic never branches on this.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the record as a point-in-time stock level.
    pub fn level(&self) -> StockLevel {
        StockLevel {
            quantity_on_hand: self.quantity_on_hand,
            quantity_reserved: self.quantity_reserved,
            available: self.available(),
        }
    }

    pub(crate) fn set_quantities(&mut self, on_hand: u32, reserved: u32) {
        debug_assert!(reserved <= on_hand);
        self.quantity_on_hand = on_hand;
        self.quantity_reserved = reserved;
        self.updated_at = Utc::now();
    }
}

/// Snapshot of one product's stock position, with the derived availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Physically present quantity.
    pub quantity_on_hand: u32,
    /// Quantity held by reservations.
    pub quantity_reserved: u32,
    /// `on_hand - reserved`.
    pub available: u32,
}
