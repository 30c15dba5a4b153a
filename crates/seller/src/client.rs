//! Distributor client boundary.
//!
//! The seller escalates items it cannot cover to the distributor through
//! this typed contract. As with the distributor → manufacturer boundary,
//! calls are bounded by a timeout and failures degrade at the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{ProductId, SellerId};
use distributor::{
    Availability, ClientError, DistributorService, ManufacturerClient, OrderPlacement,
    DEFAULT_CALL_TIMEOUT,
};

/// Typed contract for the seller → distributor boundary.
#[async_trait]
pub trait DistributorClient: Send + Sync {
    /// Asks how much of a product the distributor has available.
    async fn availability(&self, product_id: &ProductId) -> Result<Availability, ClientError>;

    /// Places a single-product order with the distributor.
    async fn place_order(
        &self,
        seller_id: SellerId,
        product_id: &ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<OrderPlacement, ClientError>;
}

/// In-process client for a co-located [`DistributorService`].
pub struct DirectDistributorClient<M: ManufacturerClient> {
    service: Arc<DistributorService<M>>,
    timeout: Duration,
}

impl<M: ManufacturerClient> DirectDistributorClient<M> {
    /// Wraps a distributor service with the default call timeout.
    pub fn new(service: Arc<DistributorService<M>>) -> Self {
        Self {
            service,
            timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Overrides the call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(&self, fut: impl Future<Output = T> + Send) -> Result<T, ClientError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))
    }
}

#[async_trait]
impl<M: ManufacturerClient> DistributorClient for DirectDistributorClient<M> {
    async fn availability(&self, product_id: &ProductId) -> Result<Availability, ClientError> {
        self.bounded(async { self.service.availability(product_id) })
            .await
    }

    async fn place_order(
        &self,
        seller_id: SellerId,
        product_id: &ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<OrderPlacement, ClientError> {
        self.bounded(async {
            self.service
                .place_order(seller_id, product_id, quantity, notes)
                .await
                .map_err(|e| ClientError::Rejected(e.to_string()))
        })
        .await?
    }
}
