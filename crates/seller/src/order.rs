//! Customer order model and the item-status fold.

use chrono::{DateTime, Utc};
use common::{CustomerInfo, Money, OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// Outcome of a single item's fulfillment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderItemStatus {
    /// Not yet attempted.
    #[default]
    Pending,

    /// Covered from seller stock or delivered by the distributor.
    Fulfilled,

    /// Escalated; the distributor is waiting on the manufacturer.
    Processing,

    /// Could not be fulfilled anywhere. No retry, no partial quantity.
    Unavailable,
}

impl OrderItemStatus {
    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderItemStatus::Pending => "Pending",
            OrderItemStatus::Fulfilled => "Fulfilled",
            OrderItemStatus::Processing => "Processing",
            OrderItemStatus::Unavailable => "Unavailable",
        }
    }
}

impl std::fmt::Display for OrderItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a customer order, derived from its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CustomerOrderStatus {
    /// At least one item is still in flight.
    #[default]
    Processing,

    /// Every item was fulfilled (terminal).
    Fulfilled,

    /// At least one item is unavailable and none are in flight (terminal).
    Cancelled,
}

impl CustomerOrderStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CustomerOrderStatus::Fulfilled | CustomerOrderStatus::Cancelled
        )
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerOrderStatus::Processing => "Processing",
            CustomerOrderStatus::Fulfilled => "Fulfilled",
            CustomerOrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for CustomerOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Folds item outcomes into the order-level status.
///
/// The tie-break order matters: all Fulfilled ⇒ Fulfilled; any Unavailable
/// with none Processing ⇒ Cancelled; otherwise Processing. An order with
/// both Unavailable and Processing items is Processing — goods are still
/// on the way, so the order is not dead.
pub fn derive_order_status(items: &[OrderItem]) -> CustomerOrderStatus {
    let all_fulfilled = items
        .iter()
        .all(|item| item.status == OrderItemStatus::Fulfilled);
    if all_fulfilled {
        return CustomerOrderStatus::Fulfilled;
    }

    let any_unavailable = items
        .iter()
        .any(|item| item.status == OrderItemStatus::Unavailable);
    let any_processing = items
        .iter()
        .any(|item| item.status == OrderItemStatus::Processing);

    if any_unavailable && !any_processing {
        CustomerOrderStatus::Cancelled
    } else {
        CustomerOrderStatus::Processing
    }
}

/// A single line of a customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product ordered.
    pub product_id: ProductId,
    /// Display name of the product model.
    pub model_name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Money,
    /// Outcome of the fulfillment attempt.
    pub status: OrderItemStatus,
}

impl OrderItem {
    /// Creates a pending order item.
    pub fn new(
        product_id: impl Into<ProductId>,
        model_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            model_name: model_name.into(),
            quantity,
            unit_price,
            status: OrderItemStatus::Pending,
        }
    }

    /// Returns the line subtotal (quantity × unit price), derived on read.
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A customer's order with the seller.
///
/// Owns its items exclusively; items do not exist outside a parent order.
/// Constructed whole after all items have been processed, so a partially
/// processed order is never observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerOrder {
    id: OrderId,
    customer: CustomerInfo,
    status: CustomerOrderStatus,
    order_date: DateTime<Utc>,
    fulfilled_date: Option<DateTime<Utc>>,
    total_amount: Money,
    items: Vec<OrderItem>,
}

impl CustomerOrder {
    pub(crate) fn new(customer: CustomerInfo, items: Vec<OrderItem>) -> Self {
        let status = derive_order_status(&items);
        let total_amount = items
            .iter()
            .fold(Money::zero(), |total, item| total + item.subtotal());

        Self {
            id: OrderId::new(),
            customer,
            status,
            order_date: Utc::now(),
            fulfilled_date: (status == CustomerOrderStatus::Fulfilled).then(Utc::now),
            total_amount,
            items,
        }
    }

    /// Returns the order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Returns the customer details.
    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Returns the derived order status.
    pub fn status(&self) -> CustomerOrderStatus {
        self.status
    }

    /// Returns when the order was placed.
    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns when the order was fully fulfilled, if it was.
    pub fn fulfilled_date(&self) -> Option<DateTime<Utc>> {
        self.fulfilled_date
    }

    /// Returns the order total.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the order's items.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }
}
