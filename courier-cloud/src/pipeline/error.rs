//! Pipeline error taxonomy
//!
//! Only [`MutationError`] aborts a transition. Lookup, dispatch and broadcast
//! errors are contained at the orchestrator boundary and folded into the
//! returned diagnostics.

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::DispatchDebug;
use std::time::Duration;
use thiserror::Error;

use courier_channel::ChannelError;

/// Backing store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Lifecycle guard: the record already left `pending`
    #[error("Notification {0} is no longer pending")]
    NotPending(i64),

    /// The store rejected the operation; `payload` is its raw diagnostic
    #[error("Store rejected operation: {message}")]
    Rejected { message: String, payload: Value },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Diagnostic payload, passed through unchanged
    pub fn payload(&self) -> Value {
        match self {
            Self::Rejected { payload, .. } => payload.clone(),
            other => serde_json::json!({ "message": other.to_string() }),
        }
    }
}

/// The order state change could not be persisted
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {order_id} update rejected: {message}")]
    Rejected {
        order_id: String,
        message: String,
        payload: Value,
    },
}

impl MutationError {
    pub fn from_store(order_id: &str, e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => Self::OrderNotFound(order_id.to_string()),
            other => Self::Rejected {
                order_id: order_id.to_string(),
                message: other.to_string(),
                payload: other.payload(),
            },
        }
    }
}

impl From<MutationError> for AppError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {id}"))
                    .with_detail("order_id", id)
            }
            MutationError::Rejected {
                order_id,
                message,
                payload,
            } => AppError::with_message(ErrorCode::OrderUpdateRejected, message)
                .with_detail("order_id", order_id)
                .with_detail("payload", payload),
        }
    }
}

/// Customer, driver or order data could not be retrieved
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {0} has no customer")]
    NoCustomer(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Customer {0} has no phone on file")]
    NoPhone(String),

    #[error("{what} lookup timed out after {after:?}")]
    Timeout { what: &'static str, after: Duration },

    #[error("{what} lookup failed: {source}")]
    Store {
        what: &'static str,
        #[source]
        source: StoreError,
    },
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        let code = match &e {
            LookupError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            LookupError::NoCustomer(_) | LookupError::CustomerNotFound(_) => {
                ErrorCode::CustomerNotFound
            }
            LookupError::NoPhone(_) => ErrorCode::CustomerPhoneMissing,
            LookupError::Timeout { .. } => ErrorCode::TimeoutError,
            LookupError::Store { .. } => ErrorCode::DatabaseError,
        };
        AppError::with_message(code, e.to_string())
    }
}

/// The message channel call failed or is misconfigured
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No credential configured; nothing was sent or recorded
    #[error("Message channel is not configured")]
    NotConfigured { debug: DispatchDebug },

    /// Normalized phone is empty
    #[error("Invalid phone number: {raw:?}")]
    InvalidPhone { raw: String },

    /// The record of intent could not be written; nothing was sent
    #[error("Could not record notification: {0}")]
    Record(#[source] StoreError),

    /// The channel rejected or failed the send
    #[error("Message channel failed: {source}")]
    Channel {
        record_id: Option<i64>,
        #[source]
        source: ChannelError,
        debug: DispatchDebug,
    },
}

impl DispatchError {
    pub fn record_id(&self) -> Option<i64> {
        match self {
            Self::Channel { record_id, .. } => *record_id,
            _ => None,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Channel { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<Value> {
        match self {
            Self::Channel { source, .. } => Some(source.payload()),
            Self::Record(e) => Some(e.payload()),
            _ => None,
        }
    }

    pub fn debug(&self) -> Option<&DispatchDebug> {
        match self {
            Self::NotConfigured { debug } | Self::Channel { debug, .. } => Some(debug),
            _ => None,
        }
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        let code = match &e {
            DispatchError::NotConfigured { .. } => ErrorCode::ChannelNotConfigured,
            DispatchError::InvalidPhone { .. } => ErrorCode::ValidationFailed,
            DispatchError::Record(_) => ErrorCode::DatabaseError,
            DispatchError::Channel { source, .. } => match source {
                ChannelError::Http { .. } => ErrorCode::ChannelRejected,
                ChannelError::Timeout(_) => ErrorCode::TimeoutError,
                ChannelError::Network(_) => ErrorCode::NetworkError,
                ChannelError::MissingCredential => ErrorCode::ChannelNotConfigured,
                ChannelError::InvalidConfig(_) => ErrorCode::ConfigError,
            },
        };
        let mut err = AppError::with_message(code, e.to_string());
        if let Some(record_id) = e.record_id() {
            err = err.with_detail("record_id", record_id);
        }
        if let Some(payload) = e.payload() {
            err = err.with_detail("payload", payload);
        }
        if let Some(debug) = e.debug() {
            err = err.with_detail(
                "debug",
                serde_json::to_value(debug).unwrap_or(Value::Null),
            );
        }
        err
    }
}

/// Drivers webhook failure (logged, never propagated)
#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("Webhook answered HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Webhook request failed: {0}")]
    Network(String),

    #[error("Webhook timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_error_keeps_store_payload() {
        let store_err = StoreError::Rejected {
            message: "violates check constraint".into(),
            payload: serde_json::json!({"code": "23514", "constraint": "orders_status_check"}),
        };
        let err = MutationError::from_store("O1", store_err);
        match &err {
            MutationError::Rejected { payload, .. } => {
                assert_eq!(payload["constraint"], "orders_status_check");
            }
            other => panic!("unexpected {other:?}"),
        }

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::OrderUpdateRejected);
        assert_eq!(
            app.details.unwrap()["payload"]["code"],
            serde_json::json!("23514")
        );
    }

    #[test]
    fn test_not_found_maps_to_order_not_found() {
        let err = MutationError::from_store(
            "O9",
            StoreError::NotFound {
                entity: "Order",
                id: "O9".into(),
            },
        );
        assert!(matches!(err, MutationError::OrderNotFound(ref id) if id == "O9"));
        assert_eq!(AppError::from(err).code, ErrorCode::OrderNotFound);
    }

    #[test]
    fn test_dispatch_error_to_app_error_carries_debug() {
        let err = DispatchError::Channel {
            record_id: Some(7),
            source: ChannelError::Http {
                status: 401,
                payload: serde_json::json!({"error": "bad token"}),
            },
            debug: DispatchDebug {
                credentials_configured: true,
                base_url: "https://gateway.test".into(),
                phone: "24177123456".into(),
            },
        };
        assert_eq!(err.http_status(), Some(401));

        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ChannelRejected);
        let details = app.details.unwrap();
        assert_eq!(details["record_id"], 7);
        assert_eq!(details["debug"]["phone"], "24177123456");
    }
}
