//! Channel adapters for sending text messages
//!
//! Supports:
//! - HTTP gateways with bearer authentication (JSON body)

use crate::error::{ChannelError, ChannelResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Message accepted by the channel
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    /// Provider message identifier, when the channel returned one
    pub id: Option<String>,
    /// Raw response body
    pub raw: Value,
}

/// Static description of a channel, used for operator diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub name: String,
    pub base_url: String,
    pub credentials_configured: bool,
}

/// Trait for channel adapters
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Send a plain text message to a canonical (digits only) phone number
    async fn send_text(&self, to: &str, body: &str) -> ChannelResult<SentMessage>;

    /// Describe this channel
    fn info(&self) -> ChannelInfo;

    /// Longest time one `send_text` call may take, when the channel bounds itself
    fn send_budget(&self) -> Option<Duration> {
        None
    }
}

/// Endpoint and JSON field names of one HTTP send route
#[derive(Debug, Clone, PartialEq)]
pub struct SendRoute {
    pub path: String,
    pub to_field: String,
    pub body_field: String,
}

impl SendRoute {
    /// Route posting `{"to": .., "text": ..}` to `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            to_field: "to".to_string(),
            body_field: "text".to_string(),
        }
    }

    /// Override the JSON field names
    pub fn with_fields(mut self, to_field: impl Into<String>, body_field: impl Into<String>) -> Self {
        self.to_field = to_field.into();
        self.body_field = body_field.into();
        self
    }
}

impl Default for SendRoute {
    fn default() -> Self {
        Self::new("/api/send-message")
    }
}

/// HTTP message gateway
#[derive(Debug, Clone)]
pub struct HttpChannel {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    route: SendRoute,
    timeout: Duration,
}

impl HttpChannel {
    /// Create a new HTTP channel
    ///
    /// A missing or blank token is accepted here; every send then fails with
    /// [`ChannelError::MissingCredential`].
    pub fn new(base_url: &str, token: Option<String>) -> ChannelResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ChannelError::InvalidConfig(format!("Invalid base URL {base_url}: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            route: SendRoute::default(),
            timeout: Duration::from_secs(10),
        })
    }

    /// Set the send route
    pub fn with_route(mut self, route: SendRoute) -> Self {
        self.route = route;
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        if self.route.path.starts_with('/') {
            format!("{}{}", self.base_url, self.route.path)
        } else {
            format!("{}/{}", self.base_url, self.route.path)
        }
    }

    async fn post(&self, token: &str, to: &str, body: &str) -> ChannelResult<SentMessage> {
        let mut payload = serde_json::Map::new();
        payload.insert(self.route.to_field.clone(), Value::String(to.to_string()));
        payload.insert(self.route.body_field.clone(), Value::String(body.to_string()));

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        let raw = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            return Err(ChannelError::Http {
                status: status.as_u16(),
                payload: raw,
            });
        }

        Ok(SentMessage {
            id: extract_message_id(&raw),
            raw,
        })
    }
}

#[async_trait]
impl MessageChannel for HttpChannel {
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint(), body_len = body.len()))]
    async fn send_text(&self, to: &str, body: &str) -> ChannelResult<SentMessage> {
        let Some(token) = self.token.as_deref() else {
            warn!("Channel token not configured, refusing to send");
            return Err(ChannelError::MissingCredential);
        };

        let sent = tokio::time::timeout(self.timeout, self.post(token, to, body))
            .await
            .map_err(|_| ChannelError::Timeout(self.timeout))??;

        info!(message_id = ?sent.id, "Message accepted by channel");
        Ok(sent)
    }

    fn info(&self) -> ChannelInfo {
        ChannelInfo {
            name: format!("http:{}", self.route.path),
            base_url: self.base_url.clone(),
            credentials_configured: self.token.is_some(),
        }
    }

    fn send_budget(&self) -> Option<Duration> {
        Some(self.timeout)
    }
}

/// Pull a message id out of the common gateway response shapes
fn extract_message_id(raw: &Value) -> Option<String> {
    const CANDIDATES: [&str; 5] = ["/id", "/messageId", "/message_id", "/data/id", "/data/msgId"];

    CANDIDATES
        .iter()
        .filter_map(|pointer| raw.pointer(pointer))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
