//! Order endpoints: status transition, manual resend, notification audit

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{
    CustomerReport, DriverNotification, NotificationRecord, OrderUpdate, TransitionResponse,
};

use crate::state::AppState;

use super::ApiResult;

/// POST /api/orders/{id}/transition
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub status: String,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
}

impl From<TransitionRequest> for OrderUpdate {
    fn from(req: TransitionRequest) -> Self {
        OrderUpdate {
            status: Some(req.status),
            delivery_address: req.delivery_address,
            delivery_date: req.delivery_date,
            delivery_time: req.delivery_time,
            notes: req.notes,
        }
    }
}

pub async fn transition(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> ApiResult<TransitionResponse> {
    if req.status.trim().is_empty() {
        return Err(AppError::validation("status is required").into());
    }

    let response = state
        .pipeline
        .perform_transition(&order_id, req.into())
        .await?;
    Ok(ApiResponse::success(response))
}

/// POST /api/orders/{id}/notifications/resend
#[derive(Debug, Default, Deserialize)]
pub struct ResendRequest {
    pub status: Option<String>,
    pub message: Option<String>,
}

pub async fn resend_notification(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    body: Option<Json<ResendRequest>>,
) -> ApiResult<CustomerReport> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let report = state
        .pipeline
        .resend_notification(&order_id, req.status, req.message)
        .await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/orders/{id}/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Vec<NotificationRecord>> {
    let records = state.notifications.list_for_order(&order_id).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/orders/{id}/driver-notifications
pub async fn list_driver_notifications(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Vec<DriverNotification>> {
    let rows = state.driver_notifications.list_by_order(&order_id).await?;
    Ok(ApiResponse::success(rows))
}
