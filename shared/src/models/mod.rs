//! Data models
//!
//! Shared between courier-cloud and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Order, customer and driver IDs are owned by external systems and kept as
//! strings; records created by the notification pipeline use snowflake `i64`.

pub mod customer;
pub mod driver;
pub mod driver_notification;
pub mod message_template;
pub mod notification;
pub mod order;
pub mod transition;

// Re-exports
pub use customer::*;
pub use driver::*;
pub use driver_notification::*;
pub use message_template::*;
pub use notification::*;
pub use order::*;
pub use transition::*;
