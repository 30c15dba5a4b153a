//! Manufacturer client boundary.
//!
//! The distributor never touches the manufacturer's state directly; it
//! goes through [`ManufacturerClient`], a typed request/response contract
//! over the network boundary. Every call is bounded by a timeout; callers
//! treat a timed-out or failed call as a failed request and degrade to a
//! conservative default rather than retrying.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use manufacturer::{CapacityCheck, ManufacturerService, ProductionOrder};
use thiserror::Error;

/// Default bound on remote calls between services.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures crossing a service boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The remote call did not complete within the timeout.
    #[error("Remote call timed out after {0:?}")]
    Timeout(Duration),

    /// The transport failed before a response arrived.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The remote service answered with a refusal or failure.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Typed contract for the distributor → manufacturer boundary.
#[async_trait]
pub trait ManufacturerClient: Send + Sync {
    /// Asks whether the manufacturer can satisfy `quantity` units,
    /// optionally by `requested_by`.
    async fn check_capacity(
        &self,
        product_id: &ProductId,
        quantity: u32,
        requested_by: Option<DateTime<Utc>>,
    ) -> Result<CapacityCheck, ClientError>;

    /// Raises a backorder, tagging it with the distributor order that
    /// triggered it. `Ok(None)` means the manufacturer refused (e.g. the
    /// product is not configured for production).
    async fn create_production_order(
        &self,
        product_id: &ProductId,
        quantity: u32,
        external_order_id: OrderId,
    ) -> Result<Option<ProductionOrder>, ClientError>;

    /// Looks up the production order raised for an external order.
    async fn find_by_external_order(
        &self,
        external_order_id: OrderId,
    ) -> Result<Option<ProductionOrder>, ClientError>;

    /// Asks the manufacturer to ship `quantity` units of a completed
    /// production order. A shipment the manufacturer cannot honor comes
    /// back as [`ClientError::Rejected`].
    async fn ship_production(
        &self,
        production_order_id: OrderId,
        quantity: u32,
    ) -> Result<ProductionOrder, ClientError>;
}

/// In-process client for a co-located [`ManufacturerService`].
///
/// Used when both services run in the same process (tests, single-node
/// deployments). The timeout still applies, keeping the call semantics
/// identical to a networked client.
#[derive(Debug, Clone)]
pub struct DirectManufacturerClient {
    service: ManufacturerService,
    timeout: Duration,
}

impl DirectManufacturerClient {
    /// Wraps a manufacturer service with the default call timeout.
    pub fn new(service: ManufacturerService) -> Self {
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
impl ManufacturerClient for DirectManufacturerClient {
    async fn check_capacity(
        &self,
        product_id: &ProductId,
        quantity: u32,
        requested_by: Option<DateTime<Utc>>,
    ) -> Result<CapacityCheck, ClientError> {
        self.bounded(async { self.service.check_capacity(product_id, quantity, requested_by) })
            .await
    }

    async fn create_production_order(
        &self,
        product_id: &ProductId,
        quantity: u32,
        external_order_id: OrderId,
    ) -> Result<Option<ProductionOrder>, ClientError> {
        self.bounded(async {
            self.service
                .create_production_order(product_id, quantity, Some(external_order_id))
        })
        .await
    }

    async fn find_by_external_order(
        &self,
        external_order_id: OrderId,
    ) -> Result<Option<ProductionOrder>, ClientError> {
        self.bounded(async { self.service.find_by_external_order(external_order_id) })
            .await
    }

    async fn ship_production(
        &self,
        production_order_id: OrderId,
        quantity: u32,
    ) -> Result<ProductionOrder, ClientError> {
        self.bounded(async {
            self.service
                .ship_production(production_order_id, quantity)
                .map_err(|e| ClientError::Rejected(e.to_string()))
        })
        .await?
    }
}
