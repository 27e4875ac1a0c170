//! API routes for courier-cloud

pub mod drivers;
pub mod health;
pub mod orders;

use axum::Router;
use axum::routing::{get, post};
use shared::error::ApiResponse;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let orders = Router::new()
        .route("/api/orders/{id}/transition", post(orders::transition))
        .route(
            "/api/orders/{id}/notifications/resend",
            post(orders::resend_notification),
        )
        .route("/api/orders/{id}/notifications", get(orders::list_notifications))
        .route(
            "/api/orders/{id}/driver-notifications",
            get(orders::list_driver_notifications),
        );

    let drivers = Router::new().route(
        "/api/drivers/{id}/notifications",
        get(drivers::list_notifications),
    );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(orders)
        .merge(drivers)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
