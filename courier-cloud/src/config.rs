//! Service configuration
//!
//! Everything is read from the environment (a `.env` file is loaded first by
//! `main`). Pipeline tuning lives in [`PipelineConfig`], which has sensible
//! defaults so tests can build orchestrators without any environment.

use std::time::Duration;

use courier_channel::{ChannelResult, PhoneNormalizer};
use shared::models::OrderStatus;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Message channel settings
    pub channel: ChannelConfig,
    /// Pipeline behavior
    pub pipeline: PipelineConfig,
    /// Realtime drivers webhook (disabled when unset)
    pub drivers_webhook_url: Option<String>,
}

/// Message channel (SMS/WhatsApp gateway) settings
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub base_url: String,
    /// Bearer credential; sends fail fast when absent
    pub api_token: Option<String>,
    /// Primary send route
    pub send_path: String,
    /// Secondary route tried when the primary fails (empty disables)
    pub fallback_path: Option<String>,
}

/// Pipeline behavior knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound for one message channel call
    pub channel_timeout: Duration,
    /// Upper bound for driver directory and order lookups
    pub directory_timeout: Duration,
    /// Upper bound for the drivers webhook call
    pub webhook_timeout: Duration,
    /// Status that triggers the driver fan-out
    pub work_available_status: OrderStatus,
    pub phone: PhoneConfig,
}

/// Phone normalization settings
#[derive(Debug, Clone)]
pub struct PhoneConfig {
    pub default_country_code: String,
    /// National trunk prefix (empty disables trunk handling)
    pub trunk_prefix: String,
    pub recognized_codes: Vec<String>,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            default_country_code: "241".into(),
            trunk_prefix: "0".into(),
            recognized_codes: vec!["241".into(), "33".into()],
        }
    }
}

impl PhoneConfig {
    pub fn normalizer(&self) -> ChannelResult<PhoneNormalizer> {
        let normalizer = PhoneNormalizer::new(&self.default_country_code)?
            .with_trunk_prefix(&self.trunk_prefix)?
            .with_recognized_codes(&self.recognized_codes)?;
        Ok(normalizer)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_timeout: Duration::from_millis(10_000),
            directory_timeout: Duration::from_millis(5_000),
            webhook_timeout: Duration::from_millis(5_000),
            work_available_status: OrderStatus::Preparing,
            phone: PhoneConfig::default(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a set variable, keeping the default only when it is unset or blank
fn parse_value<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, BoxError> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| BoxError::from(format!("{name} must be an integer, got {v:?}"))),
    }
}

fn env_millis(name: &str, default: u64) -> Result<Duration, BoxError> {
    parse_value(name, std::env::var(name).ok(), default).map(Duration::from_millis)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = env_or("ENVIRONMENT", "development");

        let api_token = env_opt("CHANNEL_API_TOKEN");
        if api_token.is_none() && environment != "development" {
            tracing::warn!(
                "CHANNEL_API_TOKEN is not set in {environment}; customer messages will fail"
            );
        }

        let status_value = env_or("DRIVER_WORK_STATUS", OrderStatus::Preparing.as_str());
        let work_available_status = OrderStatus::parse(&status_value)
            .ok_or_else(|| format!("DRIVER_WORK_STATUS has unknown status: {status_value}"))?;

        let phone = PhoneConfig {
            default_country_code: env_or("DEFAULT_COUNTRY_CODE", "241"),
            trunk_prefix: std::env::var("TRUNK_PREFIX").unwrap_or_else(|_| "0".into()),
            recognized_codes: env_or("RECOGNIZED_COUNTRY_CODES", "241,33")
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        };
        // Fail at startup rather than on the first dispatch
        phone.normalizer()?;

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: parse_value("HTTP_PORT", std::env::var("HTTP_PORT").ok(), 8080)?,
            channel: ChannelConfig {
                base_url: env_or("CHANNEL_BASE_URL", "https://api.textchannel.local"),
                api_token,
                send_path: env_or("CHANNEL_SEND_PATH", "/api/send-message"),
                fallback_path: match std::env::var("CHANNEL_FALLBACK_PATH") {
                    Ok(v) if v.trim().is_empty() => None,
                    Ok(v) => Some(v.trim().to_string()),
                    Err(_) => Some("/api/messages".into()),
                },
            },
            pipeline: PipelineConfig {
                channel_timeout: env_millis("CHANNEL_TIMEOUT_MS", 10_000)?,
                directory_timeout: env_millis("DIRECTORY_TIMEOUT_MS", 5_000)?,
                webhook_timeout: env_millis("WEBHOOK_TIMEOUT_MS", 5_000)?,
                work_available_status,
                phone,
            },
            drivers_webhook_url: env_opt("DRIVERS_WEBHOOK_URL"),
            environment,
        })
    }
}
