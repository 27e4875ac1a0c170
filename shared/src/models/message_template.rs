//! Message Template Model

use serde::{Deserialize, Serialize};

/// Stored message template, keyed by order status value.
///
/// The body may contain `{placeholder}` tokens and literal `\n` sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MessageTemplate {
    pub status_key: String,
    pub body: String,
    pub updated_at: i64,
}
