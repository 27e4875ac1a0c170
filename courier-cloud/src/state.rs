//! Application state for courier-cloud

use std::sync::Arc;

use courier_channel::{FallbackChannel, HttpChannel, MessageChannel, SendRoute};
use sqlx::PgPool;

use crate::config::{ChannelConfig, Config, PipelineConfig};
use crate::db::PgStore;
use crate::pipeline::{
    Collaborators, DriverBroadcaster, DriverNotificationStore, NotificationStore,
    TransitionOrchestrator,
};
use crate::webhook::{HttpBroadcaster, NoopBroadcaster};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TransitionOrchestrator>,
    /// Audit reads for customer messages
    pub notifications: Arc<dyn NotificationStore>,
    /// Audit reads for driver notifications
    pub driver_notifications: Arc<dyn DriverNotificationStore>,
}

/// Primary route plus the optional secondary one
pub fn build_channel(
    config: &ChannelConfig,
    pipeline: &PipelineConfig,
) -> Result<Arc<dyn MessageChannel>, BoxError> {
    let primary = HttpChannel::new(&config.base_url, config.api_token.clone())?
        .with_route(SendRoute::new(&config.send_path))
        .with_timeout(pipeline.channel_timeout);

    let Some(fallback_path) = &config.fallback_path else {
        return Ok(Arc::new(primary));
    };

    let secondary = HttpChannel::new(&config.base_url, config.api_token.clone())?
        .with_route(SendRoute::new(fallback_path).with_fields("phone", "message"))
        .with_timeout(pipeline.channel_timeout);

    let strategies: Vec<Arc<dyn MessageChannel>> = vec![Arc::new(primary), Arc::new(secondary)];
    Ok(Arc::new(FallbackChannel::new(strategies)))
}

impl AppState {
    /// Assemble state around an already-built set of collaborators
    pub fn from_collaborators(
        collaborators: Collaborators,
        pipeline: &PipelineConfig,
    ) -> Result<Self, BoxError> {
        let notifications = collaborators.notifications.clone();
        let driver_notifications = collaborators.driver_notifications.clone();
        let pipeline = TransitionOrchestrator::new(collaborators, pipeline)?;

        Ok(Self {
            pipeline: Arc::new(pipeline),
            notifications,
            driver_notifications,
        })
    }

    /// Connect to PostgreSQL, run migrations and wire the pipeline
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let store = Arc::new(PgStore::new(pool));
        let channel = build_channel(&config.channel, &config.pipeline)?;
        let info = channel.info();
        tracing::info!(
            channel = %info.name,
            base_url = %info.base_url,
            credentials_configured = info.credentials_configured,
            "Message channel ready"
        );

        let broadcaster: Arc<dyn DriverBroadcaster> = match &config.drivers_webhook_url {
            Some(url) => {
                tracing::info!(url = %url, "Drivers webhook enabled");
                Arc::new(HttpBroadcaster::new(url.clone()))
            }
            None => Arc::new(NoopBroadcaster),
        };

        let collaborators = Collaborators {
            orders: store.clone(),
            customers: store.clone(),
            drivers: store.clone(),
            templates: store.clone(),
            notifications: store.clone(),
            driver_notifications: store,
            broadcaster,
            channel,
        };

        Self::from_collaborators(collaborators, &config.pipeline)
    }
}
