//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order and customer errors
//! - 5xxx: Notification / message-channel errors
//! - 6xxx: Driver errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// The order store rejected the update
    OrderUpdateRejected = 4002,
    /// Customer not found
    CustomerNotFound = 4101,
    /// Customer has no phone number on file
    CustomerPhoneMissing = 4102,

    // ==================== 5xxx: Notification ====================
    /// Notification record not found
    NotificationNotFound = 5001,
    /// Message dispatch failed
    NotificationDispatchFailed = 5002,
    /// Message channel credential is not configured
    ChannelNotConfigured = 5003,
    /// Message channel rejected the request
    ChannelRejected = 5004,

    // ==================== 6xxx: Driver ====================
    /// Driver not found
    DriverNotFound = 6001,
    /// Driver directory could not be queried
    DriverDirectoryUnavailable = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderUpdateRejected => "Order update was rejected by the store",
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CustomerPhoneMissing => "Customer has no phone number on file",

            // Notification
            ErrorCode::NotificationNotFound => "Notification not found",
            ErrorCode::NotificationDispatchFailed => "Message dispatch failed",
            ErrorCode::ChannelNotConfigured => "Message channel credential is not configured",
            ErrorCode::ChannelRejected => "Message channel rejected the request",

            // Driver
            ErrorCode::DriverNotFound => "Driver not found",
            ErrorCode::DriverDirectoryUnavailable => "Driver directory is unavailable",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderUpdateRejected),
            4101 => Ok(ErrorCode::CustomerNotFound),
            4102 => Ok(ErrorCode::CustomerPhoneMissing),

            // Notification
            5001 => Ok(ErrorCode::NotificationNotFound),
            5002 => Ok(ErrorCode::NotificationDispatchFailed),
            5003 => Ok(ErrorCode::ChannelNotConfigured),
            5004 => Ok(ErrorCode::ChannelRejected),

            // Driver
            6001 => Ok(ErrorCode::DriverNotFound),
            6002 => Ok(ErrorCode::DriverDirectoryUnavailable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
