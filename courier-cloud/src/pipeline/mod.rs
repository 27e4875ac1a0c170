//! Order status transition pipeline
//!
//! ```text
//! caller → OrderGateway (write) → TransitionOrchestrator
//!            ├─ TemplateRenderer → MessageDispatcher → NotificationStore
//!            └─ DriverFanout → DriverNotificationStore (+ drivers webhook)
//! ```
//!
//! Collaborators are injected as trait objects (see [`traits`]).

pub mod dispatcher;
pub mod error;
pub mod fanout;
pub mod gateway;
pub mod memory;
pub mod orchestrator;
pub mod template;
pub mod traits;

pub use dispatcher::{DispatchResult, MessageBody, MessageDispatcher};
pub use error::{BroadcastError, DispatchError, LookupError, MutationError, StoreError};
pub use fanout::{DriverFanout, FanoutOutcome};
pub use gateway::OrderGateway;
pub use memory::MemoryStore;
pub use orchestrator::{Collaborators, TransitionOrchestrator};
pub use template::{TemplateRenderer, TemplateVars};
pub use traits::*;
