//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer directory entry (read-only for the pipeline)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
}

impl Customer {
    /// Phone on file, ignoring blank values
    pub fn reachable_phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}
