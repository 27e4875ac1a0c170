//! Collaborator seams of the transition pipeline
//!
//! Every external system is reached through one of these traits and injected
//! as `Arc<dyn ...>`, so tests can substitute doubles.

use async_trait::async_trait;
use shared::models::{
    Customer, Driver, DriverNotification, DriverNotificationCreate, NotificationCreate,
    NotificationOutcome, NotificationRecord, Order, OrderUpdate,
};

use super::error::{BroadcastError, StoreError};

pub type StoreResult<T> = Result<T, StoreError>;

/// Order store (owned by order management)
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    /// Partial update returning the post-mutation row, `None` if the id is unknown
    async fn update_order(&self, order_id: &str, update: &OrderUpdate)
    -> StoreResult<Option<Order>>;
}

/// Customer directory
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn get_customer(&self, customer_id: &str) -> StoreResult<Option<Customer>>;
}

/// Driver directory
#[async_trait]
pub trait DriverDirectory: Send + Sync {
    /// Drivers currently available for new work
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>>;
}

/// Message template store
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn get_template(&self, status_key: &str) -> StoreResult<Option<String>>;
}

/// Notification record store (customer messages)
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a record in `pending` state
    async fn create_pending(&self, data: NotificationCreate) -> StoreResult<NotificationRecord>;

    /// Move a `pending` record to `sent` or `failed`.
    ///
    /// Fails with [`StoreError::NotPending`] if the record already completed.
    async fn complete(
        &self,
        record_id: i64,
        outcome: NotificationOutcome,
    ) -> StoreResult<NotificationRecord>;

    async fn list_for_order(&self, order_id: &str) -> StoreResult<Vec<NotificationRecord>>;
}

/// Driver notification store
#[async_trait]
pub trait DriverNotificationStore: Send + Sync {
    async fn create(&self, data: DriverNotificationCreate) -> StoreResult<DriverNotification>;

    async fn list_by_driver(&self, driver_id: &str) -> StoreResult<Vec<DriverNotification>>;

    async fn list_by_order(&self, order_id: &str) -> StoreResult<Vec<DriverNotification>>;
}

/// Payload broadcast to realtime-connected driver clients
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkAvailable {
    pub event: &'static str,
    pub order_id: String,
    pub order_number: String,
    pub driver_count: usize,
}

/// Drivers webhook (realtime availability broadcast)
#[async_trait]
pub trait DriverBroadcaster: Send + Sync {
    /// `false` when no endpoint is configured
    fn is_enabled(&self) -> bool;

    async fn broadcast(&self, event: &WorkAvailable) -> Result<(), BroadcastError>;
}
