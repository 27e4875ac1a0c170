//! In-memory collaborators
//!
//! Implements every store trait in process with the same semantics
//! as the PostgreSQL adapter: apply-and-return order updates, the pending-only
//! completion guard, and driver foreign-key checks on fan-out inserts.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use shared::models::{
    Customer, Driver, DriverNotification, DriverNotificationCreate, NotificationCreate,
    NotificationOutcome, NotificationRecord, NotificationStatus, Order, OrderUpdate,
};
use shared::util::{now_millis, snowflake_id};

use super::error::StoreError;
use super::traits::{
    CustomerDirectory, DriverDirectory, DriverNotificationStore, NotificationStore, OrderStore,
    StoreResult, TemplateStore,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    orders: DashMap<String, Order>,
    customers: DashMap<String, Customer>,
    drivers: DashMap<String, Driver>,
    templates: DashMap<String, String>,
    notifications: RwLock<Vec<NotificationRecord>>,
    driver_notifications: RwLock<Vec<DriverNotification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_order(&self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn put_customer(&self, customer: Customer) {
        self.customers.insert(customer.id.clone(), customer);
    }

    pub fn put_driver(&self, driver: Driver) {
        self.drivers.insert(driver.id.clone(), driver);
    }

    pub fn put_template(&self, status_key: &str, body: &str) {
        self.templates
            .insert(status_key.to_string(), body.to_string());
    }

    /// Every notification record, oldest first
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.notifications.read().clone()
    }

    /// Every driver notification, in insertion order
    pub fn driver_notifications(&self) -> Vec<DriverNotification> {
        self.driver_notifications.read().clone()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.orders.get(order_id).map(|o| o.value().clone()))
    }

    async fn update_order(
        &self,
        order_id: &str,
        update: &OrderUpdate,
    ) -> StoreResult<Option<Order>> {
        if matches!(&update.status, Some(s) if s.trim().is_empty()) {
            return Err(StoreError::Rejected {
                message: "status must not be empty".into(),
                payload: serde_json::json!({
                    "code": "23514",
                    "message": "new row violates check constraint \"orders_status_not_empty\"",
                }),
            });
        }

        Ok(self.orders.get_mut(order_id).map(|mut entry| {
            let order = entry.value_mut();
            update.apply_to(order);
            order.updated_at = now_millis();
            order.clone()
        }))
    }
}

#[async_trait]
impl CustomerDirectory for MemoryStore {
    async fn get_customer(&self, customer_id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.get(customer_id).map(|c| c.value().clone()))
    }
}

#[async_trait]
impl DriverDirectory for MemoryStore {
    async fn list_available_drivers(&self) -> StoreResult<Vec<Driver>> {
        let mut drivers: Vec<Driver> = self
            .drivers
            .iter()
            .filter(|d| d.is_available)
            .map(|d| d.value().clone())
            .collect();
        drivers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(drivers)
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn get_template(&self, status_key: &str) -> StoreResult<Option<String>> {
        Ok(self.templates.get(status_key).map(|t| t.value().clone()))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_pending(&self, data: NotificationCreate) -> StoreResult<NotificationRecord> {
        let record = NotificationRecord {
            id: snowflake_id(),
            phone: data.phone,
            message: data.message,
            order_id: data.order_id,
            status: NotificationStatus::Pending,
            provider_message_id: None,
            error: None,
            created_at: now_millis(),
            updated_at: None,
        };
        self.notifications.write().push(record.clone());
        Ok(record)
    }

    async fn complete(
        &self,
        record_id: i64,
        outcome: NotificationOutcome,
    ) -> StoreResult<NotificationRecord> {
        let mut records = self.notifications.write();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Notification",
                id: record_id.to_string(),
            })?;
        if record.status != NotificationStatus::Pending {
            return Err(StoreError::NotPending(record_id));
        }

        record.status = outcome.status();
        match outcome {
            NotificationOutcome::Sent {
                provider_message_id,
            } => record.provider_message_id = provider_message_id,
            NotificationOutcome::Failed { error } => record.error = Some(error),
        }
        record.updated_at = Some(now_millis());
        Ok(record.clone())
    }

    async fn list_for_order(&self, order_id: &str) -> StoreResult<Vec<NotificationRecord>> {
        Ok(self
            .notifications
            .read()
            .iter()
            .filter(|r| r.order_id.as_deref() == Some(order_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DriverNotificationStore for MemoryStore {
    async fn create(&self, data: DriverNotificationCreate) -> StoreResult<DriverNotification> {
        if data.driver_id.trim().is_empty() || !self.drivers.contains_key(&data.driver_id) {
            return Err(StoreError::Rejected {
                message: format!("unknown driver id {:?}", data.driver_id),
                payload: serde_json::json!({
                    "code": "23503",
                    "message": "insert violates foreign key constraint \"driver_notifications_driver_id_fkey\"",
                    "driver_id": data.driver_id,
                }),
            });
        }

        let row = DriverNotification {
            id: snowflake_id(),
            driver_id: data.driver_id,
            order_id: data.order_id,
            kind: data.kind,
            message: data.message,
            read: false,
            created_at: now_millis(),
        };
        self.driver_notifications.write().push(row.clone());
        Ok(row)
    }

    async fn list_by_driver(&self, driver_id: &str) -> StoreResult<Vec<DriverNotification>> {
        // Newest first, like the driver inbox
        Ok(self
            .driver_notifications
            .read()
            .iter()
            .rev()
            .filter(|n| n.driver_id == driver_id)
            .cloned()
            .collect())
    }

    async fn list_by_order(&self, order_id: &str) -> StoreResult<Vec<DriverNotification>> {
        Ok(self
            .driver_notifications
            .read()
            .iter()
            .filter(|n| n.order_id.as_deref() == Some(order_id))
            .cloned()
            .collect())
    }
}
