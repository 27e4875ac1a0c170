//! Transition pipeline response DTOs
//!
//! A successful transition always carries the updated order. Whether the
//! customer or the drivers were actually reached is reported here, never
//! through the overall call failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::order::Order;

/// Result of `perform_transition`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub order: Order,
    pub notifications: NotificationsReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsReport {
    pub customer: CustomerReport,
    pub drivers: DriverReport,
}

/// Operator-facing diagnostics of a failed dispatch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DispatchDebug {
    pub credentials_configured: bool,
    pub base_url: String,
    /// Normalized phone the send was addressed to
    pub phone: String,
}

/// Customer notification branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerReport {
    pub attempted: bool,
    pub success: bool,
    pub detail: CustomerDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CustomerDetail {
    Sent {
        record_id: Option<i64>,
        message_id: Option<String>,
        phone: String,
    },
    Failed {
        record_id: Option<i64>,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        debug: Option<DispatchDebug>,
    },
    Skipped {
        reason: String,
    },
}

impl CustomerReport {
    /// Branch not attempted (no customer, no phone, lookup failure)
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            attempted: false,
            success: false,
            detail: CustomerDetail::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn sent(record_id: Option<i64>, message_id: Option<String>, phone: String) -> Self {
        Self {
            attempted: true,
            success: true,
            detail: CustomerDetail::Sent {
                record_id,
                message_id,
                phone,
            },
        }
    }

    /// Attempted but not delivered
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            attempted: true,
            success: false,
            detail: CustomerDetail::Failed {
                record_id: None,
                error: error.into(),
                http_status: None,
                payload: None,
                debug: None,
            },
        }
    }
}

/// Driver fan-out branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverReport {
    pub attempted: bool,
    /// DriverNotification rows created
    pub count: usize,
    pub detail: DriverDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DriverDetail {
    /// Status is not the "work available" status
    NotApplicable { status: String },
    Notified {
        eligible: usize,
        failures: Vec<DriverFailure>,
        webhook: WebhookStatus,
    },
    /// Fan-out could not run at all (directory unavailable, panic)
    Failed { error: String },
}

impl DriverReport {
    pub fn not_applicable(status: impl Into<String>) -> Self {
        Self {
            attempted: false,
            count: 0,
            detail: DriverDetail::NotApplicable {
                status: status.into(),
            },
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            attempted: true,
            count: 0,
            detail: DriverDetail::Failed {
                error: error.into(),
            },
        }
    }
}

/// One driver whose notification could not be persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DriverFailure {
    pub driver_id: String,
    pub error: String,
}

/// Realtime drivers webhook outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WebhookStatus {
    Delivered,
    Failed { error: String },
    Disabled,
}
