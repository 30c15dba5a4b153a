//! Distributor service facade.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::{OrderId, ProductId, SellerId};
use inventory::{InventoryLedger, StockLevel};
use manufacturer::ProductionOrderStatus;
use serde::{Deserialize, Serialize};

use crate::client::ManufacturerClient;
use crate::error::Result;
use crate::order::{DistributorOrder, DistributorOrderStatus};

/// Response to a seller placing an order (`POST distributorOrder`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlacement {
    /// The distributor order that was recorded.
    pub order_id: OrderId,
    /// Final status of the recorded order.
    pub status: DistributorOrderStatus,
    /// Human-readable summary of the decision.
    pub message: String,
    /// True when the order was served from regional stock on the spot.
    pub fulfilled_from_stock: bool,
    /// True when a manufacturer backorder was required.
    pub requires_manufacturer_order: bool,
    /// Estimated days until delivery for escalated orders.
    pub estimated_delivery_days: Option<u32>,
}

/// Response to a reverse-fulfillment trigger
/// (`POST distributorOrder/{id}/receive-from-manufacturer`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveOutcome {
    /// Whether the reconciliation went through.
    pub success: bool,
    /// What happened, or why it did not.
    pub message: String,
    /// The order the trigger addressed.
    pub order_id: OrderId,
    /// Current order status, when the order exists. Lets the caller decide
    /// whether a failed trigger is worth retrying.
    pub order_status: Option<DistributorOrderStatus>,
}

/// Response to a seller availability query (`GET distributorAvailability`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// True when any stock is available.
    pub is_available: bool,
    /// Units free for new orders.
    pub available_quantity: u32,
    /// Human-readable summary.
    pub message: String,
}

/// The distributor's service surface: regional ledger, order book, and the
/// manufacturer client.
pub struct DistributorService<M: ManufacturerClient> {
    ledger: InventoryLedger,
    orders: Arc<RwLock<HashMap<OrderId, DistributorOrder>>>,
    manufacturer: M,
}

impl<M: ManufacturerClient> DistributorService<M> {
    /// Creates a distributor with an empty ledger and order book.
    pub fn new(manufacturer: M) -> Self {
        Self {
            ledger: InventoryLedger::new(),
            orders: Arc::new(RwLock::new(HashMap::new())),
            manufacturer,
        }
    }

    /// Returns the distributor's inventory ledger.
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Handles an incoming seller order for one product.
    ///
    /// Decision sequence:
    /// 1. If regional stock covers the quantity, reserve and immediately
    ///    consume it; the order is recorded `Fulfilled`.
    /// 2. Otherwise ask the manufacturer for a capacity check. Infeasible
    ///    (or unreachable) ⇒ the order is recorded `Cancelled` and no
    ///    backorder is raised.
    /// 3. Feasible ⇒ the order is recorded `PendingManufacturer`, then a
    ///    production order is raised with this order's ID as the external
    ///    reference. If raising it fails, the failure is logged and the
    ///    order stays `PendingManufacturer` — a known consistency gap,
    ///    reconciled by a later explicit `receive_from_manufacturer`.
    #[tracing::instrument(skip(self), fields(product = %product_id, quantity))]
    pub async fn place_order(
        &self,
        seller_id: SellerId,
        product_id: &ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<OrderPlacement> {
        metrics::counter!("distributor_orders_total").increment(1);
        let mut order = DistributorOrder::new(seller_id, product_id.clone(), quantity, notes);
        let order_id = order.id();

        // The reserve itself is the availability check: it only succeeds
        // when available >= quantity, atomically.
        if self.ledger.reserve(product_id, quantity) {
            self.ledger.consume_reserved(product_id, quantity)?;
            let remaining = self
                .ledger
                .stock(product_id)
                .map(|level| level.available)
                .unwrap_or(0);

            order.mark_fulfilled("Fulfilled from regional stock");
            self.insert_order(order);

            metrics::counter!("distributor_orders_fulfilled_from_stock").increment(1);
            tracing::info!(%order_id, remaining, "order fulfilled from stock");
            return Ok(OrderPlacement {
                order_id,
                status: DistributorOrderStatus::Fulfilled,
                message: format!("Fulfilled from stock; {} units remain available", remaining),
                fulfilled_from_stock: true,
                requires_manufacturer_order: false,
                estimated_delivery_days: None,
            });
        }

        // Regional stock is short: ask the manufacturer. A failed or
        // timed-out call degrades to "cannot produce".
        let check = match self
            .manufacturer
            .check_capacity(product_id, quantity, None)
            .await
        {
            Ok(check) => check,
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "manufacturer capacity check failed, degrading to cannot-produce");
                order.mark_cancelled(format!("Manufacturer unavailable: {}", e));
                self.insert_order(order);
                metrics::counter!("distributor_orders_cancelled").increment(1);
                return Ok(OrderPlacement {
                    order_id,
                    status: DistributorOrderStatus::Cancelled,
                    message: "Out of stock and manufacturer is unavailable".to_string(),
                    fulfilled_from_stock: false,
                    requires_manufacturer_order: false,
                    estimated_delivery_days: None,
                });
            }
        };

        if !check.can_produce {
            order.mark_cancelled(check.message.clone());
            self.insert_order(order);
            metrics::counter!("distributor_orders_cancelled").increment(1);
            tracing::info!(%order_id, reason = %check.message, "order cancelled, manufacturer cannot produce");
            return Ok(OrderPlacement {
                order_id,
                status: DistributorOrderStatus::Cancelled,
                message: format!("Cannot fulfill: {}", check.message),
                fulfilled_from_stock: false,
                requires_manufacturer_order: false,
                estimated_delivery_days: None,
            });
        }

        // Record the order before raising the backorder, so the external
        // reference on the production order points at an existing row.
        order.mark_pending_manufacturer();
        self.insert_order(order);

        match self
            .manufacturer
            .create_production_order(product_id, quantity, order_id)
            .await
        {
            Ok(Some(production)) => {
                tracing::info!(%order_id, production_order_id = %production.id(), "backorder raised with manufacturer");
            }
            Ok(None) => {
                // The order stays PendingManufacturer; reconciliation is a
                // later manual step. No rollback, matching the observable
                // contract.
                tracing::warn!(%order_id, "manufacturer refused the production order; order remains pending");
            }
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "failed to raise production order; order remains pending");
            }
        }

        metrics::counter!("distributor_orders_escalated").increment(1);
        Ok(OrderPlacement {
            order_id,
            status: DistributorOrderStatus::PendingManufacturer,
            message: format!(
                "Escalated to manufacturer, estimated {} days",
                check.lead_time_days
            ),
            fulfilled_from_stock: false,
            requires_manufacturer_order: true,
            estimated_delivery_days: Some(check.lead_time_days),
        })
    }

    /// Reverse fulfillment: pulls completed production stock back into the
    /// regional ledger and closes the originating order.
    ///
    /// Invoked explicitly once the manufacturer side has progressed; there
    /// is no polling. Each step is verified before the next side effect is
    /// applied, and any failure aborts before mutating distributor state:
    /// 1. the order must exist and be `PendingManufacturer`;
    /// 2. a production order must exist for this order;
    /// 3. that production order must be `Completed` (not still `Pending`);
    /// 4. the manufacturer must accept the shipment.
    /// Only then is the regional ledger credited and the order fulfilled.
    #[tracing::instrument(skip(self))]
    pub async fn receive_from_manufacturer(&self, order_id: OrderId) -> ReceiveOutcome {
        let Some(order) = self.get_order(order_id) else {
            return ReceiveOutcome {
                success: false,
                message: format!("Distributor order {} not found", order_id),
                order_id,
                order_status: None,
            };
        };

        if !order.status().awaits_manufacturer() {
            return ReceiveOutcome {
                success: false,
                message: format!(
                    "Order is {}, not awaiting manufacturer",
                    order.status()
                ),
                order_id,
                order_status: Some(order.status()),
            };
        }

        let production = match self.manufacturer.find_by_external_order(order_id).await {
            Ok(Some(production)) => production,
            Ok(None) => {
                return ReceiveOutcome {
                    success: false,
                    message: "No production order found for this order".to_string(),
                    order_id,
                    order_status: Some(order.status()),
                };
            }
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "production order lookup failed");
                return ReceiveOutcome {
                    success: false,
                    message: format!("Manufacturer lookup failed: {}", e),
                    order_id,
                    order_status: Some(order.status()),
                };
            }
        };

        match production.status() {
            ProductionOrderStatus::Completed => {}
            ProductionOrderStatus::Pending => {
                return ReceiveOutcome {
                    success: false,
                    message: "Production is not finished; complete the production order first"
                        .to_string(),
                    order_id,
                    order_status: Some(order.status()),
                };
            }
            other => {
                return ReceiveOutcome {
                    success: false,
                    message: format!("Production order is {}, cannot receive", other),
                    order_id,
                    order_status: Some(order.status()),
                };
            }
        }

        // Last verification with a side effect on the manufacturer: the
        // shipment. If it fails, distributor inventory is untouched.
        if let Err(e) = self
            .manufacturer
            .ship_production(production.id(), order.quantity())
            .await
        {
            tracing::warn!(%order_id, error = %e, "manufacturer shipment failed, aborting reconciliation");
            return ReceiveOutcome {
                success: false,
                message: format!("Manufacturer could not ship: {}", e),
                order_id,
                order_status: Some(order.status()),
            };
        }

        self.ledger.increase_on_hand(order.product_id(), order.quantity());

        let status = {
            let mut orders = self.orders.write().unwrap();
            // The entry is re-checked under the lock; the shipment above can
            // only have succeeded for one caller.
            let order = orders.get_mut(&order_id);
            match order {
                Some(order) if order.status().awaits_manufacturer() => {
                    order.mark_fulfilled("Received from manufacturer");
                    order.status()
                }
                Some(order) => order.status(),
                None => DistributorOrderStatus::Pending,
            }
        };

        metrics::counter!("distributor_reverse_fulfillments").increment(1);
        tracing::info!(%order_id, quantity = order.quantity(), "goods received from manufacturer, order fulfilled");
        ReceiveOutcome {
            success: true,
            message: format!(
                "Received {} units from manufacturer",
                order.quantity()
            ),
            order_id,
            order_status: Some(status),
        }
    }

    /// Answers a seller's availability query for one product.
    pub fn availability(&self, product_id: &ProductId) -> Availability {
        let available = self
            .ledger
            .stock(product_id)
            .map(|level| level.available)
            .unwrap_or(0);

        Availability {
            is_available: available > 0,
            available_quantity: available,
            message: if available > 0 {
                format!("{} units available", available)
            } else {
                "Out of stock".to_string()
            },
        }
    }

    /// Looks up a distributor order by ID.
    pub fn get_order(&self, order_id: OrderId) -> Option<DistributorOrder> {
        self.orders.read().unwrap().get(&order_id).cloned()
    }

    /// Returns a snapshot of all recorded orders.
    pub fn orders(&self) -> Vec<DistributorOrder> {
        self.orders.read().unwrap().values().cloned().collect()
    }

    /// Returns the distributor's stock level for a product.
    pub fn stock(&self, product_id: &ProductId) -> Option<StockLevel> {
        self.ledger.stock(product_id)
    }

    fn insert_order(&self, order: DistributorOrder) {
        self.orders.write().unwrap().insert(order.id(), order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, DirectManufacturerClient};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use manufacturer::{CapacityCheck, ManufacturerService, ProductionCapacity, ProductionOrder};

    fn sku(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn manufacturer() -> ManufacturerService {
        let service = ManufacturerService::new();
        service.register_capacity(ProductionCapacity::new(sku("SKU-001"), 50, 3));
        service
    }

    fn distributor(
        manufacturer: ManufacturerService,
    ) -> DistributorService<DirectManufacturerClient> {
        DistributorService::new(DirectManufacturerClient::new(manufacturer))
    }

    /// Client double that fails every call, standing in for an unreachable
    /// manufacturer.
    struct UnreachableManufacturer;

    #[async_trait]
    impl ManufacturerClient for UnreachableManufacturer {
        async fn check_capacity(
            &self,
            _product_id: &ProductId,
            _quantity: u32,
            _requested_by: Option<DateTime<Utc>>,
        ) -> std::result::Result<CapacityCheck, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        async fn create_production_order(
            &self,
            _product_id: &ProductId,
            _quantity: u32,
            _external_order_id: OrderId,
        ) -> std::result::Result<Option<ProductionOrder>, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        async fn find_by_external_order(
            &self,
            _external_order_id: OrderId,
        ) -> std::result::Result<Option<ProductionOrder>, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        async fn ship_production(
            &self,
            _production_order_id: OrderId,
            _quantity: u32,
        ) -> std::result::Result<ProductionOrder, ClientError> {
            Err(ClientError::Transport("connection refused".to_string()))
        }
    }

    /// Client double whose create_production_order fails after the capacity
    /// check succeeded, to exercise the accepted consistency gap.
    struct FlakyCreateManufacturer {
        inner: DirectManufacturerClient,
    }

    #[async_trait]
    impl ManufacturerClient for FlakyCreateManufacturer {
        async fn check_capacity(
            &self,
            product_id: &ProductId,
            quantity: u32,
            requested_by: Option<DateTime<Utc>>,
        ) -> std::result::Result<CapacityCheck, ClientError> {
            self.inner.check_capacity(product_id, quantity, requested_by).await
        }

        async fn create_production_order(
            &self,
            _product_id: &ProductId,
            _quantity: u32,
            _external_order_id: OrderId,
        ) -> std::result::Result<Option<ProductionOrder>, ClientError> {
            Err(ClientError::Transport("broken pipe".to_string()))
        }

        async fn find_by_external_order(
            &self,
            external_order_id: OrderId,
        ) -> std::result::Result<Option<ProductionOrder>, ClientError> {
            self.inner.find_by_external_order(external_order_id).await
        }

        async fn ship_production(
            &self,
            production_order_id: OrderId,
            quantity: u32,
        ) -> std::result::Result<ProductionOrder, ClientError> {
            self.inner.ship_production(production_order_id, quantity).await
        }
    }

    #[tokio::test]
    async fn order_fulfilled_from_regional_stock() {
        let service = distributor(manufacturer());
        service.ledger().set_on_hand(&sku("SKU-001"), 50).unwrap();
        service.ledger().reserve(&sku("SKU-001"), 5);

        // 45 available: a request for 10 is served on the spot.
        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 10, None)
            .await
            .unwrap();

        assert_eq!(placement.status, DistributorOrderStatus::Fulfilled);
        assert!(placement.fulfilled_from_stock);
        assert!(!placement.requires_manufacturer_order);
        assert_eq!(service.stock(&sku("SKU-001")).unwrap().available, 35);

        let order = service.get_order(placement.order_id).unwrap();
        assert_eq!(order.status(), DistributorOrderStatus::Fulfilled);
        assert!(order.fulfilled_date().is_some());
    }

    #[tokio::test]
    async fn shortfall_escalates_to_manufacturer() {
        let mfg = manufacturer();
        let service = distributor(mfg.clone());

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 40, None)
            .await
            .unwrap();

        assert_eq!(placement.status, DistributorOrderStatus::PendingManufacturer);
        assert!(placement.requires_manufacturer_order);
        assert_eq!(placement.estimated_delivery_days, Some(4)); // 40 units, 50/day + 3 base

        // The backorder carries the distributor order as weak reference.
        let production = mfg.find_by_external_order(placement.order_id).unwrap();
        assert_eq!(production.quantity(), 40);
        assert_eq!(production.external_order_id(), Some(placement.order_id));
    }

    #[tokio::test]
    async fn infeasible_capacity_cancels_without_backorder() {
        let mfg = manufacturer();
        let service = distributor(mfg.clone());

        // Unconfigured SKU: the capacity check comes back negative.
        let placement = service
            .place_order(SellerId::new(), &sku("SKU-404"), 10, None)
            .await
            .unwrap();

        assert_eq!(placement.status, DistributorOrderStatus::Cancelled);
        assert!(mfg.find_by_external_order(placement.order_id).is_none());

        let order = service.get_order(placement.order_id).unwrap();
        assert_eq!(order.status(), DistributorOrderStatus::Cancelled);
        assert!(order.cancellation_reason().is_some());
    }

    #[tokio::test]
    async fn unreachable_manufacturer_degrades_to_cancelled() {
        let service = DistributorService::new(UnreachableManufacturer);

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 10, None)
            .await
            .unwrap();

        assert_eq!(placement.status, DistributorOrderStatus::Cancelled);
        assert!(!placement.requires_manufacturer_order);
    }

    #[tokio::test]
    async fn failed_backorder_creation_leaves_order_pending() {
        let client = FlakyCreateManufacturer {
            inner: DirectManufacturerClient::new(manufacturer()),
        };
        let service = DistributorService::new(client);

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 10, None)
            .await
            .unwrap();

        // Known gap: no rollback, the order stays PendingManufacturer.
        assert_eq!(placement.status, DistributorOrderStatus::PendingManufacturer);
        let order = service.get_order(placement.order_id).unwrap();
        assert_eq!(order.status(), DistributorOrderStatus::PendingManufacturer);
    }

    #[tokio::test]
    async fn receive_rejects_wrong_status_without_mutation() {
        let service = distributor(manufacturer());
        service.ledger().set_on_hand(&sku("SKU-001"), 50).unwrap();

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 10, None)
            .await
            .unwrap();
        assert_eq!(placement.status, DistributorOrderStatus::Fulfilled);

        let before = service.stock(&sku("SKU-001")).unwrap();
        let outcome = service.receive_from_manufacturer(placement.order_id).await;

        assert!(!outcome.success);
        assert_eq!(outcome.order_status, Some(DistributorOrderStatus::Fulfilled));
        assert_eq!(service.stock(&sku("SKU-001")).unwrap(), before);
    }

    #[tokio::test]
    async fn receive_unknown_order_fails() {
        let service = distributor(manufacturer());
        let outcome = service.receive_from_manufacturer(OrderId::new()).await;
        assert!(!outcome.success);
        assert!(outcome.order_status.is_none());
    }

    #[tokio::test]
    async fn receive_requires_completed_production() {
        let mfg = manufacturer();
        let service = distributor(mfg.clone());

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 40, None)
            .await
            .unwrap();

        // Production still Pending.
        let outcome = service.receive_from_manufacturer(placement.order_id).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("complete the production order"));
        assert!(service.stock(&sku("SKU-001")).is_none());
    }

    #[tokio::test]
    async fn receive_credits_stock_and_fulfills_order() {
        let mfg = manufacturer();
        let service = distributor(mfg.clone());

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 40, None)
            .await
            .unwrap();

        let production = mfg.find_by_external_order(placement.order_id).unwrap();
        mfg.complete_production(production.id()).unwrap();

        let outcome = service.receive_from_manufacturer(placement.order_id).await;
        assert!(outcome.success);
        assert_eq!(outcome.order_status, Some(DistributorOrderStatus::Fulfilled));

        assert_eq!(service.stock(&sku("SKU-001")).unwrap().available, 40);
        let order = service.get_order(placement.order_id).unwrap();
        assert_eq!(order.status(), DistributorOrderStatus::Fulfilled);
        assert!(order.fulfilled_date().is_some());

        // Manufacturer side is drained and terminal.
        assert_eq!(mfg.stock(&sku("SKU-001")).unwrap().available, 0);
        assert_eq!(
            mfg.get_order(production.id()).unwrap().status(),
            ProductionOrderStatus::Shipped
        );
    }

    #[tokio::test]
    async fn failed_shipment_leaves_distributor_untouched() {
        let mfg = manufacturer();
        let service = distributor(mfg.clone());

        let placement = service
            .place_order(SellerId::new(), &sku("SKU-001"), 40, None)
            .await
            .unwrap();

        let production = mfg.find_by_external_order(placement.order_id).unwrap();
        mfg.complete_production(production.id()).unwrap();
        // Drain manufacturer stock so the shipment is rejected.
        mfg.ledger().decrease_on_hand(&sku("SKU-001"), 40).unwrap();

        let outcome = service.receive_from_manufacturer(placement.order_id).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("could not ship"));

        // No partial credit on the distributor side.
        assert!(service.stock(&sku("SKU-001")).is_none());
        assert_eq!(
            service.get_order(placement.order_id).unwrap().status(),
            DistributorOrderStatus::PendingManufacturer
        );
    }

    #[tokio::test]
    async fn availability_reports_derived_available() {
        let service = distributor(manufacturer());
        service.ledger().set_on_hand(&sku("SKU-001"), 20).unwrap();
        service.ledger().reserve(&sku("SKU-001"), 15);

        let availability = service.availability(&sku("SKU-001"));
        assert!(availability.is_available);
        assert_eq!(availability.available_quantity, 5);

        let missing = service.availability(&sku("SKU-404"));
        assert!(!missing.is_available);
        assert_eq!(missing.available_quantity, 0);
    }
}
