//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status vocabulary
///
/// `Pending → Confirmed → Preparing → Ready → OutForDelivery → Delivered`,
/// with `Cancelled` reachable from any non-terminal state.
///
/// The stored order row keeps its status as a free string: the store accepts
/// any value, and only values that parse into this enum carry meaning for the
/// notification pipeline. Matching is case-sensitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Parse a stored status value (exact, case-sensitive)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Canonical stored value
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::OutForDelivery => "OutForDelivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Human-readable label used in customer messages
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Being prepared",
            Self::Ready => "Ready",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity (post-mutation snapshot as returned by the order store)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Public reference shown to customers and drivers
    pub order_number: String,
    /// Raw status value, see [`OrderStatus::parse`]
    pub status: String,
    pub customer_id: Option<String>,
    /// Total amount in currency unit
    pub total_amount: f64,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Parsed status, `None` for values outside the fixed vocabulary
    pub fn known_status(&self) -> Option<OrderStatus> {
        OrderStatus::parse(&self.status)
    }
}

/// Partial update payload (`None` leaves the column untouched)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.delivery_address.is_none()
            && self.delivery_date.is_none()
            && self.delivery_time.is_none()
            && self.notes.is_none()
    }

    /// Apply onto an order in place (in-memory stores)
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(status) = &self.status {
            order.status = status.clone();
        }
        if let Some(v) = &self.delivery_address {
            order.delivery_address = Some(v.clone());
        }
        if let Some(v) = &self.delivery_date {
            order.delivery_date = Some(v.clone());
        }
        if let Some(v) = &self.delivery_time {
            order.delivery_time = Some(v.clone());
        }
        if let Some(v) = &self.notes {
            order.notes = Some(v.clone());
        }
    }
}
