//! Seller order orchestrator.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::{CustomerInfo, Money, OrderId, ProductId, SellerId};
use distributor::DistributorOrderStatus;
use inventory::{InventoryLedger, StockLevel};
use serde::{Deserialize, Serialize};

use crate::client::DistributorClient;
use crate::error::{Result, SellerError};
use crate::order::{CustomerOrder, CustomerOrderStatus, OrderItem, OrderItemStatus};

/// Response to a customer placing an order (`POST customerOrder`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// The recorded order.
    pub order_id: OrderId,
    /// Order-level status derived from the item outcomes.
    pub status: CustomerOrderStatus,
    /// Human-readable summary.
    pub message: String,
    /// The items with their individual outcomes.
    pub items: Vec<OrderItem>,
    /// Order total across all items.
    pub total_amount: Money,
}

/// The seller's service surface: its own ledger, the customer order book,
/// and the distributor client.
pub struct SellerService<D: DistributorClient> {
    seller_id: SellerId,
    ledger: InventoryLedger,
    orders: Arc<RwLock<HashMap<OrderId, CustomerOrder>>>,
    distributor: D,
}

impl<D: DistributorClient> SellerService<D> {
    /// Creates a seller with an empty ledger and order book.
    pub fn new(seller_id: SellerId, distributor: D) -> Self {
        Self {
            seller_id,
            ledger: InventoryLedger::new(),
            orders: Arc::new(RwLock::new(HashMap::new())),
            distributor,
        }
    }

    /// Returns this seller's ID, used on orders placed upstream.
    pub fn seller_id(&self) -> SellerId {
        self.seller_id
    }

    /// Returns the seller's inventory ledger.
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Decomposes a multi-item customer order into per-item fulfillment
    /// attempts and records the aggregated result.
    ///
    /// Items are processed in order. Each is tried against the seller's own
    /// stock first; only when local stock is short does the distributor get
    /// involved (availability query, then an order). Items the distributor
    /// cannot serve are marked `Unavailable` and processing continues with
    /// the next item — no retries, no partial quantities. The order row is
    /// written exactly once, after the fold.
    #[tracing::instrument(skip(self, customer, items), fields(item_count = items.len()))]
    pub async fn place_customer_order(
        &self,
        customer: CustomerInfo,
        mut items: Vec<OrderItem>,
    ) -> Result<OrderReceipt> {
        if items.is_empty() {
            return Err(SellerError::NoItems);
        }

        metrics::counter!("seller_orders_total").increment(1);
        let started = std::time::Instant::now();

        for item in &mut items {
            item.status = self.fulfill_item(item).await?;
        }

        let order = CustomerOrder::new(customer, items);
        let receipt = OrderReceipt {
            order_id: order.id(),
            status: order.status(),
            message: match order.status() {
                CustomerOrderStatus::Fulfilled => "All items fulfilled".to_string(),
                CustomerOrderStatus::Processing => {
                    "Some items are awaiting upstream fulfillment".to_string()
                }
                CustomerOrderStatus::Cancelled => {
                    "Order cancelled: one or more items are unavailable".to_string()
                }
            },
            items: order.items().to_vec(),
            total_amount: order.total_amount(),
        };

        // Single write: a partially processed order is never visible.
        self.orders.write().unwrap().insert(order.id(), order);

        metrics::histogram!("seller_order_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        metrics::counter!("seller_orders_completed", "status" => receipt.status.as_str())
            .increment(1);
        tracing::info!(order_id = %receipt.order_id, status = %receipt.status, "customer order processed");

        Ok(receipt)
    }

    /// Attempts to fulfill one item, local stock first.
    async fn fulfill_item(&self, item: &OrderItem) -> Result<OrderItemStatus> {
        // Local path: the reserve doubles as the availability check.
        if self.ledger.reserve(&item.product_id, item.quantity) {
            self.ledger.consume_reserved(&item.product_id, item.quantity)?;
            tracing::debug!(product = %item.product_id, quantity = item.quantity, "item fulfilled from seller stock");
            return Ok(OrderItemStatus::Fulfilled);
        }

        // Ask the distributor before committing to an order there.
        let availability = match self.distributor.availability(&item.product_id).await {
            Ok(availability) => availability,
            Err(e) => {
                tracing::warn!(product = %item.product_id, error = %e, "distributor availability check failed");
                return Ok(OrderItemStatus::Unavailable);
            }
        };

        if !availability.is_available || availability.available_quantity < item.quantity {
            tracing::debug!(product = %item.product_id, available = availability.available_quantity, "distributor cannot cover item");
            return Ok(OrderItemStatus::Unavailable);
        }

        let placement = match self
            .distributor
            .place_order(self.seller_id, &item.product_id, item.quantity, None)
            .await
        {
            Ok(placement) => placement,
            Err(e) => {
                tracing::warn!(product = %item.product_id, error = %e, "distributor order failed");
                return Ok(OrderItemStatus::Unavailable);
            }
        };

        Ok(match placement.status {
            DistributorOrderStatus::Fulfilled => OrderItemStatus::Fulfilled,
            DistributorOrderStatus::PendingManufacturer => OrderItemStatus::Processing,
            _ => OrderItemStatus::Unavailable,
        })
    }

    /// Looks up a customer order by ID.
    pub fn get_order(&self, order_id: OrderId) -> Option<CustomerOrder> {
        self.orders.read().unwrap().get(&order_id).cloned()
    }

    /// Returns the seller's stock level for a product.
    pub fn stock(&self, product_id: &ProductId) -> Option<StockLevel> {
        self.ledger.stock(product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use distributor::{Availability, ClientError, OrderPlacement};

    fn sku(s: &str) -> ProductId {
        ProductId::new(s)
    }

    fn pending_item(product: &str, quantity: u32) -> OrderItem {
        OrderItem::new(product, product, quantity, Money::from_cents(1000))
    }

    /// Scripted distributor double: answers availability from a fixed
    /// number and records whether it was called at all.
    struct ScriptedDistributor {
        available: u32,
        placement_status: DistributorOrderStatus,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl ScriptedDistributor {
        fn new(available: u32, placement_status: DistributorOrderStatus) -> Self {
            Self {
                available,
                placement_status,
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DistributorClient for ScriptedDistributor {
        async fn availability(&self, _product_id: &ProductId) -> Result2<Availability> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Availability {
                is_available: self.available > 0,
                available_quantity: self.available,
                message: String::new(),
            })
        }

        async fn place_order(
            &self,
            _seller_id: SellerId,
            _product_id: &ProductId,
            _quantity: u32,
            _notes: Option<String>,
        ) -> Result2<OrderPlacement> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(OrderPlacement {
                order_id: OrderId::new(),
                status: self.placement_status,
                message: String::new(),
                fulfilled_from_stock: self.placement_status == DistributorOrderStatus::Fulfilled,
                requires_manufacturer_order: self.placement_status
                    == DistributorOrderStatus::PendingManufacturer,
                estimated_delivery_days: None,
            })
        }
    }

    /// Distributor double whose every call fails.
    struct UnreachableDistributor;

    #[async_trait]
    impl DistributorClient for UnreachableDistributor {
        async fn availability(&self, _product_id: &ProductId) -> Result2<Availability> {
            Err(ClientError::Transport("connection refused".to_string()))
        }

        async fn place_order(
            &self,
            _seller_id: SellerId,
            _product_id: &ProductId,
            _quantity: u32,
            _notes: Option<String>,
        ) -> Result2<OrderPlacement> {
            Err(ClientError::Transport("connection refused".to_string()))
        }
    }

    type Result2<T> = std::result::Result<T, ClientError>;

    fn customer() -> CustomerInfo {
        CustomerInfo::new("Ada", "ada@example.com")
    }

    #[tokio::test]
    async fn local_stock_fulfills_without_distributor_call() {
        let distributor = ScriptedDistributor::new(100, DistributorOrderStatus::Fulfilled);
        let service = SellerService::new(SellerId::new(), distributor);
        service.ledger().set_on_hand(&sku("SKU-001"), 10).unwrap();

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.status, CustomerOrderStatus::Fulfilled);
        assert_eq!(receipt.items[0].status, OrderItemStatus::Fulfilled);
        // The whole quantity came from seller stock; the distributor was
        // never consulted.
        assert_eq!(service.distributor.calls(), 0);
        assert_eq!(service.stock(&sku("SKU-001")).unwrap().available, 0);
    }

    #[tokio::test]
    async fn partial_local_stock_is_not_split() {
        // 5 on hand, 10 requested: local stock does not cover the item, so
        // none of it is used and the item escalates whole.
        let distributor = ScriptedDistributor::new(50, DistributorOrderStatus::Fulfilled);
        let service = SellerService::new(SellerId::new(), distributor);
        service.ledger().set_on_hand(&sku("SKU-001"), 5).unwrap();

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Fulfilled);
        assert!(service.distributor.calls() > 0);
        // Local stock untouched.
        assert_eq!(service.stock(&sku("SKU-001")).unwrap().available, 5);
    }

    #[tokio::test]
    async fn insufficient_distributor_availability_marks_unavailable() {
        let distributor = ScriptedDistributor::new(3, DistributorOrderStatus::Fulfilled);
        let service = SellerService::new(SellerId::new(), distributor);

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Unavailable);
        assert_eq!(receipt.status, CustomerOrderStatus::Cancelled);
        // Availability said no; no order was placed.
        assert_eq!(service.distributor.calls(), 1);
    }

    #[tokio::test]
    async fn pending_manufacturer_maps_to_processing() {
        let distributor = ScriptedDistributor::new(100, DistributorOrderStatus::PendingManufacturer);
        let service = SellerService::new(SellerId::new(), distributor);

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Processing);
        assert_eq!(receipt.status, CustomerOrderStatus::Processing);
    }

    #[tokio::test]
    async fn cancelled_placement_maps_to_unavailable() {
        let distributor = ScriptedDistributor::new(100, DistributorOrderStatus::Cancelled);
        let service = SellerService::new(SellerId::new(), distributor);

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Unavailable);
        assert_eq!(receipt.status, CustomerOrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn unreachable_distributor_degrades_to_unavailable() {
        let service = SellerService::new(SellerId::new(), UnreachableDistributor);

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Unavailable);
        assert_eq!(receipt.status, CustomerOrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn mixed_outcomes_fold_to_processing() {
        // Item 1 from local stock, items 2 and 3 escalate; the scripted
        // distributor answers PendingManufacturer for both.
        let distributor = ScriptedDistributor::new(100, DistributorOrderStatus::PendingManufacturer);
        let service = SellerService::new(SellerId::new(), distributor);
        service.ledger().set_on_hand(&sku("SKU-001"), 5).unwrap();

        let receipt = service
            .place_customer_order(
                customer(),
                vec![
                    pending_item("SKU-001", 5),
                    pending_item("SKU-002", 10),
                    pending_item("SKU-003", 2),
                ],
            )
            .await
            .unwrap();

        assert_eq!(receipt.items[0].status, OrderItemStatus::Fulfilled);
        assert_eq!(receipt.items[1].status, OrderItemStatus::Processing);
        assert_eq!(receipt.items[2].status, OrderItemStatus::Processing);
        assert_eq!(receipt.status, CustomerOrderStatus::Processing);
    }

    #[tokio::test]
    async fn empty_order_is_rejected() {
        let distributor = ScriptedDistributor::new(0, DistributorOrderStatus::Cancelled);
        let service = SellerService::new(SellerId::new(), distributor);

        let err = service
            .place_customer_order(customer(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, SellerError::NoItems));
    }

    #[tokio::test]
    async fn order_is_persisted_once_with_final_statuses() {
        let distributor = ScriptedDistributor::new(100, DistributorOrderStatus::Fulfilled);
        let service = SellerService::new(SellerId::new(), distributor);

        let receipt = service
            .place_customer_order(customer(), vec![pending_item("SKU-001", 10)])
            .await
            .unwrap();

        let order = service.get_order(receipt.order_id).unwrap();
        assert_eq!(order.status(), CustomerOrderStatus::Fulfilled);
        assert!(order.fulfilled_date().is_some());
        assert_eq!(order.total_amount().cents(), 10_000);
        assert!(
            order
                .items()
                .iter()
                .all(|item| item.status != OrderItemStatus::Pending)
        );
    }
}
