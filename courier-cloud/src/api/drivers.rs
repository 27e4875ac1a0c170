//! Driver endpoints

use axum::extract::{Path, State};
use shared::error::ApiResponse;
use shared::models::DriverNotification;

use crate::state::AppState;

use super::ApiResult;

/// GET /api/drivers/{id}/notifications (newest first)
pub async fn list_notifications(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> ApiResult<Vec<DriverNotification>> {
    let rows = state.driver_notifications.list_by_driver(&driver_id).await?;
    Ok(ApiResponse::success(rows))
}
