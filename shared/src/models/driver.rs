//! Driver Model

use serde::{Deserialize, Serialize};

/// Driver directory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    /// Currently accepting new work
    pub is_available: bool,
}
