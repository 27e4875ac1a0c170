//! Notification Record Model
//!
//! One record per outbound customer message attempt. The lifecycle is
//! monotonic: `pending → sent | failed`, never reset.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Notification lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for NotificationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("unknown notification status: {value}")),
        }
    }
}

/// Notification record (audit trail of one outbound message)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NotificationRecord {
    pub id: i64,
    /// Canonical phone number the message was addressed to
    pub phone: String,
    /// Rendered message body
    pub message: String,
    /// Originating order (None for ad-hoc messages)
    pub order_id: Option<String>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: NotificationStatus,
    /// Message identifier returned by the channel
    pub provider_message_id: Option<String>,
    /// Raw error payload when the send failed
    pub error: Option<Value>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Create notification payload (always starts `pending`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub phone: String,
    pub message: String,
    pub order_id: Option<String>,
}

/// Terminal outcome applied to a pending record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationOutcome {
    Sent { provider_message_id: Option<String> },
    Failed { error: Value },
}

impl NotificationOutcome {
    pub fn status(&self) -> NotificationStatus {
        match self {
            Self::Sent { .. } => NotificationStatus::Sent,
            Self::Failed { .. } => NotificationStatus::Failed,
        }
    }
}
