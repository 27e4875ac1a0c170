//! Database access layer
//!
//! Query helpers are free functions over a `PgPool`; [`PgStore`] adapts them
//! to the pipeline's store traits.

pub mod directory;
pub mod driver_notifications;
pub mod notifications;
pub mod orders;

use async_trait::async_trait;
use shared::models::{
    Customer, Driver, DriverNotification, DriverNotificationCreate, NotificationCreate,
    NotificationOutcome, NotificationRecord, Order, OrderUpdate,
};
use sqlx::PgPool;

use crate::pipeline::{
    CustomerDirectory, DriverDirectory, DriverNotificationStore, NotificationStore, OrderStore,
    StoreError, StoreResult, TemplateStore,
};

/// Map a driver error, keeping the database diagnostic for rejections
pub fn store_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) => StoreError::Rejected {
            message: db.message().to_string(),
            payload: serde_json::json!({
                "code": db.code(),
                "message": db.message(),
                "constraint": db.constraint(),
                "table": db.table(),
            }),
        },
        _ => StoreError::Unavailable(e.to_string()),
    }
}

/// PostgreSQL-backed collaborators
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        orders::get(&self.pool, order_id).await.map_err(store_error)
    }

    async fn update_order(
        &self,
        order_id: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>> {
        orders::update(&self.pool, order_id, update)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl CustomerDirectory for PgStore {
    async fn get_customer(&self, customer_id: &str) -> StoreResult<Option<Customer>> {
        directory::get_customer(&self.pool, customer_id)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl DriverDirectory for PgStore {
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>> {
        directory::list_available_drivers(&self.pool)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn get_template(&self, status_key: &str) -> StoreResult<Option<String>> {
        let template = directory::get_template(&self.pool, status_key)
            .await
            .map_err(store_error)?;
        Ok(template.map(|t| t.body))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_pending(&self, data: NotificationCreate) -> StoreResult<NotificationRecord> {
        notifications::create_pending(&self.pool, &data)
            .await
            .map_err(store_error)
    }

    async fn complete(
        &self,
        record_id: i64,
        outcome: NotificationOutcome,
    ) -> StoreResult<NotificationRecord> {
        if let Some(record) = notifications::complete(&self.pool, record_id, &outcome)
            .await
            .map_err(store_error)?
        {
            return Ok(record);
        }

        if notifications::exists(&self.pool, record_id)
            .await
            .map_err(store_error)?
        {
            Err(StoreError::NotPending(record_id))
        } else {
            Err(StoreError::NotFound {
                entity: "Notification",
                id: record_id.to_string(),
            })
        }
    }

    async fn list_for_order(&self, order_id: &str) -> StoreResult<Vec<NotificationRecord>> {
        notifications::list_for_order(&self.pool, order_id)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl DriverNotificationStore for PgStore {
    async fn create(&self, data: DriverNotificationCreate) -> StoreResult<DriverNotification> {
        driver_notifications::create(&self.pool, &data)
            .await
            .map_err(store_error)
    }

    async fn list_by_driver(&self, driver_id: &str) -> StoreResult<Vec<DriverNotification>> {
        driver_notifications::list_by_driver(&self.pool, driver_id)
            .await
            .map_err(store_error)
    }

    async fn list_by_order(&self, order_id: &str) -> StoreResult<Vec<DriverNotification>> {
        driver_notifications::list_by_order(&self.pool, order_id)
            .await
            .map_err(store_error)
    }
}
