//! Distributor service: regional inventory between sellers and the
//! manufacturer.
//!
//! An incoming seller order is either fulfilled from regional stock on the
//! spot, escalated to the manufacturer as a backorder
//! (`PendingManufacturer`), or cancelled when the manufacturer cannot
//! produce in time. Escalated orders are closed later by the explicit
//! reverse-fulfillment step, which pulls completed production stock back
//! into the distributor's ledger.
//!
//! The manufacturer sits behind the [`ManufacturerClient`] boundary trait;
//! calls through it are bounded by a timeout and degrade to conservative
//! negative answers on failure.

mod client;
mod error;
mod order;
mod service;

pub use client::{ClientError, DirectManufacturerClient, ManufacturerClient, DEFAULT_CALL_TIMEOUT};
pub use error::{DistributorError, Result};
pub use order::{DistributorOrder, DistributorOrderStatus};
pub use service::{Availability, DistributorService, OrderPlacement, ReceiveOutcome};
