//! Production order state machine.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// The state of a production order in its lifecycle.
///
/// State transitions are strictly forward-moving:
/// ```text
/// Pending ──► Completed ──► Shipped
///    │
///    └──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductionOrderStatus {
    /// Backorder accepted, production not yet finished.
    #[default]
    Pending,

    /// Production finished, output credited to the manufacturer's ledger.
    Completed,

    /// Goods debited from the ledger and released downstream (terminal).
    Shipped,

    /// Backorder cancelled before production finished (terminal).
    Cancelled,
}

impl ProductionOrderStatus {
    /// Returns true if production can be completed in this state.
    pub fn can_complete(&self) -> bool {
        matches!(self, ProductionOrderStatus::Pending)
    }

    /// Returns true if goods can be shipped in this state.
    pub fn can_ship(&self) -> bool {
        matches!(self, ProductionOrderStatus::Completed)
    }

    /// Returns true if the order can be cancelled in this state.
    pub fn can_cancel(&self) -> bool {
        matches!(self, ProductionOrderStatus::Pending)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProductionOrderStatus::Shipped | ProductionOrderStatus::Cancelled
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionOrderStatus::Pending => "Pending",
            ProductionOrderStatus::Completed => "Completed",
            ProductionOrderStatus::Shipped => "Shipped",
            ProductionOrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for ProductionOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed backorder: the manufacturer's promise to produce `quantity`
/// units of a product.
///
/// `external_order_id` is a weak back-reference to the distributor order
/// that raised the backorder. It is a lookup key only; the manufacturer
/// never dereferences it into the distributor's data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    id: OrderId,
    product_id: ProductId,
    quantity: u32,
    status: ProductionOrderStatus,
    external_order_id: Option<OrderId>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
}

impl ProductionOrder {
    pub(crate) fn new(
        product_id: ProductId,
        quantity: u32,
        external_order_id: Option<OrderId>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            product_id,
            quantity,
            status: ProductionOrderStatus::Pending,
            external_order_id,
            created_at: Utc::now(),
            completed_at: None,
            shipped_at: None,
        }
    }

    /// Returns the production order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the product being produced.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the committed quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the current status.
    pub fn status(&self) -> ProductionOrderStatus {
        self.status
    }

    /// Returns the weak reference to the originating external order, if any.
    pub fn external_order_id(&self) -> Option<OrderId> {
        self.external_order_id
    }

    /// Returns when the backorder was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when production finished, if it has.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns when the goods were shipped, if they have been.
    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = ProductionOrderStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub(crate) fn mark_shipped(&mut self) {
        self.status = ProductionOrderStatus::Shipped;
        self.shipped_at = Some(Utc::now());
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.status = ProductionOrderStatus::Cancelled;
    }
}
