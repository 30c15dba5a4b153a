//! Shared value objects used across the supply-chain services.
//!
//! Every service (seller, distributor, manufacturer) keeps its own state;
//! the only things they share are the identifier and money types defined
//! here, so that the typed request/response contracts between them line up.

mod types;

pub use types::{CustomerInfo, Money, OrderId, ProductId, SellerId};
