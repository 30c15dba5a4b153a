//! Distributor order state machine.

use chrono::{DateTime, Utc};
use common::{OrderId, ProductId, SellerId};
use serde::{Deserialize, Serialize};

/// The state of a distributor-side order from a seller.
///
/// ```text
/// Pending ──┬──► Fulfilled
///           ├──► PendingManufacturer ──► Fulfilled
///           └──► Cancelled
/// ```
///
/// `PendingManufacturer` is the intermediate state awaiting reverse
/// fulfillment; `Fulfilled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DistributorOrderStatus {
    /// Order received, not yet decided.
    #[default]
    Pending,

    /// Goods delivered to the seller (terminal).
    Fulfilled,

    /// Escalated to the manufacturer; awaiting reverse fulfillment.
    PendingManufacturer,

    /// Order cancelled (terminal).
    Cancelled,
}

impl DistributorOrderStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DistributorOrderStatus::Fulfilled | DistributorOrderStatus::Cancelled
        )
    }

    /// Returns true if the order is waiting on the manufacturer.
    pub fn awaits_manufacturer(&self) -> bool {
        matches!(self, DistributorOrderStatus::PendingManufacturer)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributorOrderStatus::Pending => "Pending",
            DistributorOrderStatus::Fulfilled => "Fulfilled",
            DistributorOrderStatus::PendingManufacturer => "PendingManufacturer",
            DistributorOrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for DistributorOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An order a seller placed with the distributor for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorOrder {
    id: OrderId,
    seller_id: SellerId,
    product_id: ProductId,
    quantity: u32,
    status: DistributorOrderStatus,
    order_date: DateTime<Utc>,
    fulfilled_date: Option<DateTime<Utc>>,
    delivery_info: Option<String>,
    cancellation_reason: Option<String>,
    notes: Option<String>,
}

impl DistributorOrder {
    pub(crate) fn new(
        seller_id: SellerId,
        product_id: ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: OrderId::new(),
            seller_id,
            product_id,
            quantity,
            status: DistributorOrderStatus::Pending,
            order_date: Utc::now(),
            fulfilled_date: None,
            delivery_info: None,
            cancellation_reason: None,
            notes,
        }
    }

    /// Returns the order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the seller that placed the order.
    pub fn seller_id(&self) -> SellerId {
        self.seller_id
    }

    /// Returns the ordered product.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Returns the ordered quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the current status.
    pub fn status(&self) -> DistributorOrderStatus {
        self.status
    }

    /// Returns when the order was received.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns when the order was fulfilled, if it has been.
    pub fn fulfilled_date(&self) -> Option<DateTime<Utc>> {
        self.fulfilled_date
    }

    /// Returns delivery details, if any.
    pub fn delivery_info(&self) -> Option<&str> {
        self.delivery_info.as_deref()
    }

    /// Returns the cancellation reason, if the order was cancelled.
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the free-form notes from the seller's request.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn mark_fulfilled(&mut self, delivery_info: impl Into<String>) {
        self.status = DistributorOrderStatus::Fulfilled;
        self.fulfilled_date = Some(Utc::now());
        self.delivery_info = Some(delivery_info.into());
    }

    pub(crate) fn mark_pending_manufacturer(&mut self) {
        self.status = DistributorOrderStatus::PendingManufacturer;
    }

    pub(crate) fn mark_cancelled(&mut self, reason: impl Into<String>) {
        self.status = DistributorOrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.into());
    }
}
