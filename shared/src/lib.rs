//! Shared types for the courier workspace
//!
//! Domain models, the unified error system and small utilities used by
//! both `courier-cloud` and API consumers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
