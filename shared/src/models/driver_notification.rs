//! Driver Notification Model

use serde::{Deserialize, Serialize};

/// Kind tag for "an order is ready to be picked up"
pub const KIND_NEW_DELIVERY: &str = "new delivery available";

/// In-app notification for a driver.
///
/// `read` is owned by the driver client; the pipeline only creates rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DriverNotification {
    pub id: i64,
    pub driver_id: String,
    /// Originating order for traceability
    pub order_id: Option<String>,
    pub kind: String,
    pub message: String,
    pub read: bool,
    pub created_at: i64,
}

/// Create driver notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverNotificationCreate {
    pub driver_id: String,
    pub order_id: Option<String>,
    pub kind: String,
    pub message: String,
}
