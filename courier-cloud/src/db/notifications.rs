//! Notification record queries
//!
//! Completion is guarded by `WHERE status = 'pending'` so the lifecycle stays
//! monotonic even under concurrent writers.

use shared::models::{NotificationCreate, NotificationOutcome, NotificationRecord};
use sqlx::PgPool;

const COLUMNS: &str =
    "id, phone, message, order_id, status, provider_message_id, error, created_at, updated_at";

pub async fn create_pending(
    pool: &PgPool,
    data: &NotificationCreate,
) -> Result<NotificationRecord, sqlx::Error> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query_as(&format!(
        r#"
        INSERT INTO notifications (id, phone, message, order_id, status, created_at)
        VALUES ($1, $2, $3, $4, 'pending', $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.phone)
    .bind(&data.message)
    .bind(&data.order_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Returns `None` when the record is missing or no longer pending
pub async fn complete(
    pool: &PgPool,
    record_id: i64,
    outcome: &NotificationOutcome,
) -> Result<Option<NotificationRecord>, sqlx::Error> {
    let (provider_message_id, error) = match outcome {
        NotificationOutcome::Sent {
            provider_message_id,
        } => (provider_message_id.clone(), None),
        NotificationOutcome::Failed { error } => (None, Some(error.clone())),
    };
    let now = shared::util::now_millis();

    sqlx::query_as(&format!(
        r#"
        UPDATE notifications SET
            status = $1,
            provider_message_id = $2,
            error = $3,
            updated_at = $4
        WHERE id = $5 AND status = 'pending'
        RETURNING {COLUMNS}
        "#
    ))
    .bind(outcome.status().as_str())
    .bind(provider_message_id)
    .bind(error)
    .bind(now)
    .bind(record_id)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, record_id: i64) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM notifications WHERE id = $1")
        .bind(record_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

pub async fn list_for_order(
    pool: &PgPool,
    order_id: &str,
) -> Result<Vec<NotificationRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM notifications WHERE order_id = $1 ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await
}
