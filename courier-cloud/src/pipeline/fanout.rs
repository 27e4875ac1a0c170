//! Driver Fan-out Notifier
//!
//! One DriverNotification per available driver, each insert independent of
//! the others, followed by a best-effort realtime broadcast.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{
    DriverDetail, DriverFailure, DriverNotificationCreate, DriverReport, KIND_NEW_DELIVERY, Order,
    WebhookStatus,
};

use super::error::{BroadcastError, LookupError};
use super::traits::{DriverBroadcaster, DriverDirectory, DriverNotificationStore, WorkAvailable};

/// Result of one fan-out run
#[derive(Debug, Clone, PartialEq)]
pub struct FanoutOutcome {
    /// Drivers returned by the directory
    pub eligible: usize,
    /// Rows actually created
    pub created: usize,
    pub failures: Vec<DriverFailure>,
    pub webhook: WebhookStatus,
}

impl From<FanoutOutcome> for DriverReport {
    fn from(outcome: FanoutOutcome) -> Self {
        DriverReport {
            attempted: true,
            count: outcome.created,
            detail: DriverDetail::Notified {
                eligible: outcome.eligible,
                failures: outcome.failures,
                webhook: outcome.webhook,
            },
        }
    }
}

/// Text shown to drivers for a newly available order
pub fn work_available_message(order: &Order) -> String {
    match order.delivery_address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => format!(
            "New delivery available: order {} to {}",
            order.order_number, address
        ),
        _ => format!("New delivery available: order {}", order.order_number),
    }
}

#[derive(Clone)]
pub struct DriverFanout {
    directory: Arc<dyn DriverDirectory>,
    store: Arc<dyn DriverNotificationStore>,
    broadcaster: Arc<dyn DriverBroadcaster>,
    directory_timeout: Duration,
    webhook_timeout: Duration,
}

impl DriverFanout {
    pub fn new(
        directory: Arc<dyn DriverDirectory>,
        store: Arc<dyn DriverNotificationStore>,
        broadcaster: Arc<dyn DriverBroadcaster>,
        directory_timeout: Duration,
        webhook_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            store,
            broadcaster,
            directory_timeout,
            webhook_timeout,
        }
    }

    /// Notify every available driver about `order`.
    ///
    /// Fails only when the driver directory cannot be read. Per-driver insert
    /// failures are collected into the outcome and logged.
    pub async fn notify_available_work(&self, order: &Order) -> Result<FanoutOutcome, LookupError> {
        let drivers = match tokio::time::timeout(
            self.directory_timeout,
            self.directory.list_available_drivers(),
        )
        .await
        {
            Ok(Ok(drivers)) => drivers,
            Ok(Err(source)) => {
                return Err(LookupError::Store {
                    what: "Driver directory",
                    source,
                });
            }
            Err(_) => {
                return Err(LookupError::Timeout {
                    what: "Driver directory",
                    after: self.directory_timeout,
                });
            }
        };

        let message = work_available_message(order);
        let mut created = 0;
        let mut failures = Vec::new();

        for driver in &drivers {
            let data = DriverNotificationCreate {
                driver_id: driver.id.clone(),
                order_id: Some(order.id.clone()),
                kind: KIND_NEW_DELIVERY.to_string(),
                message: message.clone(),
            };
            match self.store.create(data).await {
                Ok(_) => created += 1,
                Err(e) => {
                    tracing::warn!(
                        order_id = %order.id,
                        driver_id = %driver.id,
                        error = %e,
                        "Driver notification insert failed"
                    );
                    failures.push(DriverFailure {
                        driver_id: driver.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            let failed_ids: Vec<&str> = failures.iter().map(|f| f.driver_id.as_str()).collect();
            if created == 0 {
                tracing::error!(
                    order_id = %order.id,
                    eligible = drivers.len(),
                    failed = ?failed_ids,
                    "Driver fan-out failed for every driver"
                );
            } else {
                tracing::warn!(
                    order_id = %order.id,
                    eligible = drivers.len(),
                    created,
                    failed = ?failed_ids,
                    "Driver fan-out partially failed"
                );
            }
        }

        let webhook = self.broadcast(order, created).await;

        tracing::info!(
            order_id = %order.id,
            eligible = drivers.len(),
            created,
            "Driver fan-out complete"
        );

        Ok(FanoutOutcome {
            eligible: drivers.len(),
            created,
            failures,
            webhook,
        })
    }

    async fn broadcast(&self, order: &Order, driver_count: usize) -> WebhookStatus {
        if !self.broadcaster.is_enabled() {
            return WebhookStatus::Disabled;
        }

        let event = WorkAvailable {
            event: "delivery.available",
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            driver_count,
        };
        let result =
            match tokio::time::timeout(self.webhook_timeout, self.broadcaster.broadcast(&event))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(BroadcastError::Timeout(self.webhook_timeout)),
            };

        match result {
            Ok(()) => WebhookStatus::Delivered,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Drivers webhook broadcast failed");
                WebhookStatus::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
