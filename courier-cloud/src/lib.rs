//! courier-cloud: order status transition pipeline
//!
//! On every order status change the service:
//! - persists the new state through the Order Mutation Gateway
//! - messages the customer with a templated text (audited per attempt)
//! - notifies available drivers when the order becomes deliverable work
//!
//! Notification failures never undo or fail the state change; they are
//! reported in the transition response and kept in the audit tables.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod webhook;
