//! Message Dispatcher
//!
//! normalize → render → record intent (`pending`) → send → complete.
//! The record is written before the channel call so a crash mid-send still
//! leaves an auditable trace.

use std::sync::Arc;
use std::time::Duration;

use courier_channel::{ChannelError, MessageChannel, PhoneNormalizer};
use shared::models::{DispatchDebug, NotificationCreate, NotificationOutcome};
use tracing::instrument;

use super::error::DispatchError;
use super::template::{TemplateRenderer, TemplateVars};
use super::traits::NotificationStore;

/// What to send
#[derive(Debug, Clone)]
pub enum MessageBody {
    /// Render the template stored for `status_key`
    Template {
        status_key: String,
        vars: TemplateVars,
    },
    /// Pre-rendered text, bypasses templating
    Custom(String),
}

/// A delivered message
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    /// NotificationRecord id (None for messages without an order)
    pub record_id: Option<i64>,
    /// Identifier returned by the channel
    pub message_id: Option<String>,
    /// Normalized phone
    pub phone: String,
    pub message: String,
}

#[derive(Clone)]
pub struct MessageDispatcher {
    channel: Arc<dyn MessageChannel>,
    records: Arc<dyn NotificationStore>,
    renderer: TemplateRenderer,
    normalizer: PhoneNormalizer,
    timeout: Duration,
}

impl MessageDispatcher {
    pub fn new(
        channel: Arc<dyn MessageChannel>,
        records: Arc<dyn NotificationStore>,
        renderer: TemplateRenderer,
        normalizer: PhoneNormalizer,
        timeout: Duration,
    ) -> Self {
        Self {
            channel,
            records,
            renderer,
            normalizer,
            timeout,
        }
    }

    fn debug_bundle(&self, phone: &str) -> DispatchDebug {
        let info = self.channel.info();
        DispatchDebug {
            credentials_configured: info.credentials_configured,
            base_url: info.base_url,
            phone: phone.to_string(),
        }
    }

    /// Send one message, optionally tied to an order.
    ///
    /// Does not deduplicate: each call is one send attempt.
    #[instrument(skip(self, raw_phone, body, order_id), fields(order_id = order_id.unwrap_or("-")))]
    pub async fn dispatch(
        &self,
        raw_phone: &str,
        body: MessageBody,
        order_id: Option<&str>,
    ) -> Result<DispatchResult, DispatchError> {
        let phone = self.normalizer.normalize(raw_phone);
        if phone.is_empty() {
            return Err(DispatchError::InvalidPhone {
                raw: raw_phone.to_string(),
            });
        }

        // Fail fast: without a credential nothing is sent or recorded
        if !self.channel.info().credentials_configured {
            tracing::warn!(phone = %phone, "Message channel has no credential configured");
            return Err(DispatchError::NotConfigured {
                debug: self.debug_bundle(&phone),
            });
        }

        let message = match body {
            MessageBody::Template { status_key, vars } => {
                self.renderer.render(&status_key, &vars).await
            }
            MessageBody::Custom(text) => text,
        };

        let record_id = match order_id {
            Some(order_id) => {
                let record = self
                    .records
                    .create_pending(NotificationCreate {
                        phone: phone.clone(),
                        message: message.clone(),
                        order_id: Some(order_id.to_string()),
                    })
                    .await
                    .map_err(DispatchError::Record)?;
                Some(record.id)
            }
            None => None,
        };

        // A self-bounded channel (e.g. a strategy list) gets its full budget
        let budget = self
            .channel
            .send_budget()
            .map_or(self.timeout, |b| b.max(self.timeout));
        let sent = match tokio::time::timeout(budget, self.channel.send_text(&phone, &message)).await
        {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout(budget)),
        };

        match sent {
            Ok(sent) => {
                if let Some(id) = record_id {
                    let outcome = NotificationOutcome::Sent {
                        provider_message_id: sent.id.clone(),
                    };
                    // The message is out; a bookkeeping failure does not undo that
                    if let Err(e) = self.records.complete(id, outcome).await {
                        tracing::warn!(record_id = id, error = %e, "Failed to mark notification sent");
                    }
                }
                tracing::info!(phone = %phone, message_id = ?sent.id, "Message sent");
                Ok(DispatchResult {
                    record_id,
                    message_id: sent.id,
                    phone,
                    message,
                })
            }
            Err(source) => {
                if let Some(id) = record_id {
                    let outcome = NotificationOutcome::Failed {
                        error: source.payload(),
                    };
                    if let Err(e) = self.records.complete(id, outcome).await {
                        tracing::warn!(record_id = id, error = %e, "Failed to mark notification failed");
                    }
                }
                tracing::warn!(phone = %phone, error = %source, "Message channel send failed");
                Err(DispatchError::Channel {
                    record_id,
                    debug: self.debug_bundle(&phone),
                    source,
                })
            }
        }
    }
}
