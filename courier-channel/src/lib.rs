//! # courier-channel
//!
//! Outbound text-message channel library - low-level delivery only.
//!
//! ## Scope
//!
//! This crate handles HOW to reach a phone:
//! - Phone number normalization into the channel's canonical format
//! - Bearer-authenticated HTTP delivery (`HttpChannel`)
//! - Ordered transport strategies tried in sequence (`FallbackChannel`)
//!
//! Business logic (WHAT to send and WHEN) stays in application code:
//! - Status templates, audit records, driver fan-out → courier-cloud
//!
//! ## Example
//!
//! ```ignore
//! use courier_channel::{HttpChannel, MessageChannel, PhoneNormalizer, SendRoute};
//!
//! let phone = PhoneNormalizer::default().normalize("07 70 12 34 56");
//!
//! let channel = HttpChannel::new("https://gateway.example.com", Some(token))?
//!     .with_route(SendRoute::new("/api/send-message"));
//! let sent = channel.send_text(&phone, "Your order is on its way").await?;
//! ```

mod channel;
mod error;
mod fallback;
mod phone;

// Re-exports
pub use channel::{ChannelInfo, HttpChannel, MessageChannel, SendRoute, SentMessage};
pub use error::{ChannelError, ChannelResult};
pub use fallback::FallbackChannel;
pub use phone::PhoneNormalizer;
