//! Inventory ledger shared by the supply-chain services.
//!
//! Each service (seller, distributor, manufacturer) instantiates its own
//! [`InventoryLedger`] and is the only writer to it. The ledger tracks
//! on-hand and reserved quantity per product; `available` is always derived
//! as `on_hand - reserved`, never stored.
//!
//! Quantity checks and mutations happen under a single writer lock, so
//! reservation is a compare-and-increment: two concurrent reservations for
//! the same product can never both pass an availability check against stale
//! reads.

mod error;
mod ledger;
mod record;

pub use error::{InventoryError, Result};
pub use ledger::InventoryLedger;
pub use record::{InventoryRecord, StockLevel};
