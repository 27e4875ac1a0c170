//! Service-layer error type for courier-cloud
//!
//! `ServiceError` bridges store/pipeline errors and the API-layer `AppError`
//! so handlers can use `?` directly.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::pipeline::{LookupError, MutationError, StoreError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: infrastructure errors (logged, mapped to InternalError)
/// - `App`: business errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<MutationError> for ServiceError {
    fn from(e: MutationError) -> Self {
        ServiceError::App(e.into())
    }
}

impl From<LookupError> for ServiceError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::Store { source, .. } => source.into(),
            other => ServiceError::App(other.into()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
