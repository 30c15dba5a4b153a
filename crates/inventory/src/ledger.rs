//! Inventory ledger implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::ProductId;

use crate::error::{InventoryError, Result};
use crate::record::{InventoryRecord, StockLevel};

/// One service's inventory ledger: a map of product records behind a
/// writer lock.
///
/// The handle is cheap to clone; clones share the same records. All
/// check-then-mutate sequences run under the write lock, which makes every
/// operation linearizable per product.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    records: Arc<RwLock<HashMap<ProductId, InventoryRecord>>>,
}

impl InventoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the on-hand quantity for a product, creating the record if
    /// absent. Intended for bootstrap and stock-take corrections.
    ///
    /// Fails if the new on-hand quantity would fall below the quantity
    /// currently reserved.
    pub fn set_on_hand(&self, product_id: &ProductId, quantity: u32) -> Result<StockLevel> {
        let mut records = self.records.write().unwrap();
        match records.get_mut(product_id) {
            Some(record) => {
                let reserved = record.quantity_reserved();
                if quantity < reserved {
                    return Err(InventoryError::ReservedExceedsOnHand {
                        product_id: product_id.clone(),
                        on_hand: quantity,
                        reserved,
                    });
                }
                record.set_quantities(quantity, reserved);
                Ok(record.level())
            }
            None => {
                let record = InventoryRecord::new(product_id.clone(), quantity);
                let level = record.level();
                records.insert(product_id.clone(), record);
                Ok(level)
            }
        }
    }

    /// Places a hold of `quantity` units against available stock.
    ///
    /// Returns `true` and increments the reservation iff
    /// `available >= quantity`; returns `false` with no mutation otherwise.
    /// Running out of stock is a business outcome, not an error.
    pub fn reserve(&self, product_id: &ProductId, quantity: u32) -> bool {
        let mut records = self.records.write().unwrap();
        let Some(record) = records.get_mut(product_id) else {
            return false;
        };
        if record.available() < quantity {
            return false;
        }
        record.set_quantities(
            record.quantity_on_hand(),
            record.quantity_reserved() + quantity,
        );
        true
    }

    /// Releases `quantity` units of a previous hold back to availability.
    ///
    /// Releasing more than is reserved signals a logic error in the caller
    /// and fails without mutating.
    pub fn release(&self, product_id: &ProductId, quantity: u32) -> Result<StockLevel> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))?;
        let reserved = record.quantity_reserved();
        if reserved < quantity {
            return Err(InventoryError::InsufficientReserved {
                product_id: product_id.clone(),
                reserved,
                requested: quantity,
            });
        }
        record.set_quantities(record.quantity_on_hand(), reserved - quantity);
        Ok(record.level())
    }

    /// Credits newly arrived stock (production completed, goods received
    /// from upstream), creating the record if absent.
    pub fn increase_on_hand(&self, product_id: &ProductId, quantity: u32) -> StockLevel {
        let mut records = self.records.write().unwrap();
        let record = records
            .entry(product_id.clone())
            .or_insert_with(|| InventoryRecord::new(product_id.clone(), 0));
        record.set_quantities(
            record.quantity_on_hand() + quantity,
            record.quantity_reserved(),
        );
        record.level()
    }

    /// Debits stock that physically leaves the ledger without having been
    /// reserved first. Requires `available >= quantity`.
    pub fn decrease_on_hand(&self, product_id: &ProductId, quantity: u32) -> Result<StockLevel> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))?;
        let available = record.available();
        if available < quantity {
            return Err(InventoryError::InsufficientStock {
                product_id: product_id.clone(),
                available,
                requested: quantity,
            });
        }
        record.set_quantities(
            record.quantity_on_hand() - quantity,
            record.quantity_reserved(),
        );
        Ok(record.level())
    }

    /// Converts a reservation into consumption: the reserved-then-fulfill
    /// path. Requires `reserved >= quantity`; debits both counters.
    pub fn consume_reserved(&self, product_id: &ProductId, quantity: u32) -> Result<StockLevel> {
        let mut records = self.records.write().unwrap();
        let record = records
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.clone()))?;
        let reserved = record.quantity_reserved();
        if reserved < quantity {
            return Err(InventoryError::InsufficientReserved {
                product_id: product_id.clone(),
                reserved,
                requested: quantity,
            });
        }
        record.set_quantities(record.quantity_on_hand() - quantity, reserved - quantity);
        Ok(record.level())
    }

    /// Returns the stock level for a product, or `None` if no record exists.
    pub fn stock(&self, product_id: &ProductId) -> Option<StockLevel> {
        self.records
            .read()
            .unwrap()
            .get(product_id)
            .map(InventoryRecord::level)
    }

    /// Returns a snapshot of the full record for a product.
    pub fn record(&self, product_id: &ProductId) -> Option<InventoryRecord> {
        self.records.read().unwrap().get(product_id).cloned()
    }

    /// Returns all products with a ledger record.
    pub fn products(&self) -> Vec<ProductId> {
        self.records.read().unwrap().keys().cloned().collect()
    }
}
