//! Seller service: turns a multi-item customer order into per-item
//! fulfillment attempts.
//!
//! Each item is tried against the seller's own ledger first; items the
//! seller cannot cover are escalated to the distributor through the
//! [`DistributorClient`] boundary. Item outcomes are folded into a single
//! order-level status, and the order is persisted exactly once after all
//! items have been processed.

mod client;
mod error;
mod order;
mod service;

pub use client::{DirectDistributorClient, DistributorClient};
pub use error::{Result, SellerError};
pub use order::{derive_order_status, CustomerOrder, CustomerOrderStatus, OrderItem, OrderItemStatus};
pub use service::{OrderReceipt, SellerService};
