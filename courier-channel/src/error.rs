//! Error types for the channel library

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Channel error types
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No bearer credential configured
    #[error("Channel credential is not configured")]
    MissingCredential,

    /// Channel answered with a non-2xx status
    #[error("Channel rejected request: HTTP {status}")]
    Http { status: u16, payload: Value },

    /// Network connection error
    #[error("Connection failed: {0}")]
    Network(String),

    /// Timeout waiting for the channel
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid channel configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ChannelError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw diagnostic payload (the channel's body for HTTP errors)
    pub fn payload(&self) -> Value {
        match self {
            Self::Http { status, payload } => serde_json::json!({
                "status": status,
                "body": payload,
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ChannelError::InvalidConfig(e.to_string())
        } else {
            ChannelError::Network(e.to_string())
        }
    }
}

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;
