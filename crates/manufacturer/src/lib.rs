//! Manufacturer service: produces goods on backorder.
//!
//! The manufacturer owns three pieces of state: its own inventory ledger,
//! a registry of per-product production capacity, and the set of production
//! orders. A production order moves strictly forward through
//! Pending → Completed → Shipped; completing credits the manufacturer's
//! ledger, shipping debits it and releases the goods downstream.
//!
//! Capacity feasibility is computed by the planner in [`capacity`] from
//! daily throughput and the configured base lead time.

mod capacity;
mod error;
mod order;
mod service;

pub use capacity::{ProductionCapacity, ProductionPlan};
pub use error::{ManufacturerError, Result};
pub use order::{ProductionOrder, ProductionOrderStatus};
pub use service::{CapacityCheck, ManufacturerService};
