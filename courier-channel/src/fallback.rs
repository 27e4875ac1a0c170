//! Ordered transport strategies
//!
//! Each strategy is tried in turn until one accepts the message. This is a
//! plain strategy list, not retry-with-backoff: every strategy is called at
//! most once per send.

use crate::channel::{ChannelInfo, MessageChannel, SentMessage};
use crate::error::{ChannelError, ChannelResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Channel trying several strategies in order
#[derive(Clone)]
pub struct FallbackChannel {
    strategies: Vec<Arc<dyn MessageChannel>>,
}

impl FallbackChannel {
    pub fn new(strategies: Vec<Arc<dyn MessageChannel>>) -> Self {
        Self { strategies }
    }
}

impl std::fmt::Debug for FallbackChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.strategies.iter().map(|s| s.info().name).collect();
        f.debug_struct("FallbackChannel")
            .field("strategies", &names)
            .finish()
    }
}

#[async_trait]
impl MessageChannel for FallbackChannel {
    async fn send_text(&self, to: &str, body: &str) -> ChannelResult<SentMessage> {
        let mut last_error = None;

        for (idx, strategy) in self.strategies.iter().enumerate() {
            match strategy.send_text(to, body).await {
                Ok(sent) => return Ok(sent),
                // Credentials are shared by all routes; no point trying the rest
                Err(ChannelError::MissingCredential) => return Err(ChannelError::MissingCredential),
                Err(e) => {
                    warn!(
                        strategy = %strategy.info().name,
                        attempt = idx + 1,
                        remaining = self.strategies.len() - idx - 1,
                        error = %e,
                        "Transport strategy failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ChannelError::InvalidConfig("No transport strategy configured".to_string())
        }))
    }

    fn info(&self) -> ChannelInfo {
        match self.strategies.first() {
            Some(primary) => {
                let mut info = primary.info();
                info.credentials_configured =
                    self.strategies.iter().all(|s| s.info().credentials_configured);
                info.name = format!("fallback[{}]", self.strategies.len());
                info
            }
            None => ChannelInfo {
                name: "fallback[0]".to_string(),
                base_url: String::new(),
                credentials_configured: false,
            },
        }
    }

    /// Sum of every strategy's budget; unbounded if any strategy is
    fn send_budget(&self) -> Option<Duration> {
        self.strategies
            .iter()
            .map(|s| s.send_budget())
            .sum::<Option<Duration>>()
    }
}
