//! Manufacturer service facade.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use inventory::{InventoryLedger, StockLevel};
use serde::{Deserialize, Serialize};

use crate::capacity::{ProductionCapacity, ProductionPlan};
use crate::error::{ManufacturerError, Result};
use crate::order::{ProductionOrder, ProductionOrderStatus};

/// Response to a capacity check from a downstream service.
///
/// This is the boundary shape: a product with no active capacity record
/// degrades to `can_produce = false` with an explanatory message rather
/// than a typed error, so remote callers get a uniform response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityCheck {
    /// Whether the manufacturer can satisfy the request.
    pub can_produce: bool,
    /// Manufacturer stock available when the check ran.
    pub available_stock: u32,
    /// Total lead time in days (0 when served from stock).
    pub lead_time_days: u32,
    /// When the goods are expected to be ready.
    pub estimated_completion: DateTime<Utc>,
    /// Human-readable summary.
    pub message: String,
}

/// The manufacturer's service surface: its own ledger, the capacity
/// registry, and the production-order book.
///
/// Handles are cheap to clone and share state, so one instance can serve
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ManufacturerService {
    ledger: InventoryLedger,
    capacities: Arc<RwLock<HashMap<ProductId, ProductionCapacity>>>,
    orders: Arc<RwLock<HashMap<OrderId, ProductionOrder>>>,
}

impl ManufacturerService {
    /// Creates a manufacturer with an empty ledger and no capacity records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the manufacturer's inventory ledger.
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Registers (or replaces) the capacity record for a product.
    pub fn register_capacity(&self, capacity: ProductionCapacity) {
        self.capacities
            .write()
            .unwrap()
            .insert(capacity.product_id.clone(), capacity);
    }

    /// Returns the active capacity record for a product, if one exists.
    fn active_capacity(&self, product_id: &ProductId) -> Option<ProductionCapacity> {
        self.capacities
            .read()
            .unwrap()
            .get(product_id)
            .filter(|c| c.active)
            .cloned()
    }

    /// Computes a production plan for a product.
    ///
    /// A missing or inactive capacity record is a distinct failure
    /// ([`ManufacturerError::CapacityNotConfigured`]), not an infeasible
    /// plan.
    pub fn plan_production(
        &self,
        product_id: &ProductId,
        quantity: u32,
        requested_by: Option<DateTime<Utc>>,
    ) -> Result<ProductionPlan> {
        let capacity = self
            .active_capacity(product_id)
            .ok_or_else(|| ManufacturerError::CapacityNotConfigured(product_id.clone()))?;

        let available = self
            .ledger
            .stock(product_id)
            .map(|level| level.available)
            .unwrap_or(0);

        Ok(capacity.plan(quantity, available, requested_by))
    }

    /// Boundary capacity check (`POST produce`).
    #[tracing::instrument(skip(self), fields(product = %product_id))]
    pub fn check_capacity(
        &self,
        product_id: &ProductId,
        quantity: u32,
        requested_by: Option<DateTime<Utc>>,
    ) -> CapacityCheck {
        match self.plan_production(product_id, quantity, requested_by) {
            Ok(plan) => CapacityCheck {
                can_produce: plan.can_produce,
                available_stock: plan.available_stock,
                lead_time_days: plan.total_lead_time_days,
                estimated_completion: plan.estimated_completion,
                message: plan.message,
            },
            Err(e) => {
                tracing::warn!(error = %e, "capacity check failed");
                CapacityCheck {
                    can_produce: false,
                    available_stock: 0,
                    lead_time_days: 0,
                    estimated_completion: Utc::now(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Accepts a backorder for a product.
    ///
    /// Returns `None` when the order cannot be created: zero quantity, or
    /// no active capacity record for the product. Refusal is an expected
    /// business condition, not an error.
    #[tracing::instrument(skip(self), fields(product = %product_id))]
    pub fn create_production_order(
        &self,
        product_id: &ProductId,
        quantity: u32,
        external_order_id: Option<OrderId>,
    ) -> Option<ProductionOrder> {
        if quantity == 0 {
            tracing::warn!("refusing production order for zero quantity");
            return None;
        }
        if self.active_capacity(product_id).is_none() {
            tracing::warn!("refusing production order for unconfigured product");
            return None;
        }

        let order = ProductionOrder::new(product_id.clone(), quantity, external_order_id);
        let id = order.id();
        self.orders.write().unwrap().insert(id, order.clone());
        tracing::info!(order_id = %id, quantity, "production order created");
        Some(order)
    }

    /// Marks production finished: credits the output to the manufacturer's
    /// ledger, then transitions the order to Completed.
    ///
    /// Legal only from Pending; a second call fails with the current state
    /// and does not credit stock again.
    #[tracing::instrument(skip(self))]
    pub fn complete_production(&self, id: OrderId) -> Result<ProductionOrder> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(&id)
            .ok_or(ManufacturerError::OrderNotFound(id))?;

        if !order.status().can_complete() {
            return Err(ManufacturerError::InvalidState {
                current: order.status(),
                action: "complete",
            });
        }

        self.ledger
            .increase_on_hand(order.product_id(), order.quantity());
        order.mark_completed();
        tracing::info!(product = %order.product_id(), quantity = order.quantity(), "production completed, stock credited");
        Ok(order.clone())
    }

    /// Ships `quantity` units of a completed order to the downstream party.
    ///
    /// Legal only from Completed with `0 < quantity <= order.quantity`.
    /// The ledger debit runs first; if stock is insufficient the order does
    /// not transition.
    #[tracing::instrument(skip(self))]
    pub fn ship_production(&self, id: OrderId, quantity: u32) -> Result<ProductionOrder> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(&id)
            .ok_or(ManufacturerError::OrderNotFound(id))?;

        if !order.status().can_ship() {
            return Err(ManufacturerError::InvalidState {
                current: order.status(),
                action: "ship",
            });
        }
        if quantity == 0 || quantity > order.quantity() {
            return Err(ManufacturerError::InvalidQuantity {
                quantity,
                ordered: order.quantity(),
            });
        }

        self.ledger.decrease_on_hand(order.product_id(), quantity)?;
        order.mark_shipped();
        tracing::info!(product = %order.product_id(), quantity, "production order shipped");
        Ok(order.clone())
    }

    /// Cancels a backorder that has not started producing output.
    /// Legal only from Pending.
    #[tracing::instrument(skip(self))]
    pub fn cancel_production(&self, id: OrderId) -> Result<ProductionOrder> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .get_mut(&id)
            .ok_or(ManufacturerError::OrderNotFound(id))?;

        if !order.status().can_cancel() {
            return Err(ManufacturerError::InvalidState {
                current: order.status(),
                action: "cancel",
            });
        }

        order.mark_cancelled();
        Ok(order.clone())
    }

    /// Looks up a production order by ID.
    pub fn get_order(&self, id: OrderId) -> Option<ProductionOrder> {
        self.orders.read().unwrap().get(&id).cloned()
    }

    /// Looks up a production order by the external order that raised it.
    pub fn find_by_external_order(&self, external_order_id: OrderId) -> Option<ProductionOrder> {
        self.orders
            .read()
            .unwrap()
            .values()
            .find(|order| order.external_order_id() == Some(external_order_id))
            .cloned()
    }

    /// Returns the manufacturer's stock level for a product.
    pub fn stock(&self, product_id: &ProductId) -> Option<StockLevel> {
        self.ledger.stock(product_id)
    }
}
