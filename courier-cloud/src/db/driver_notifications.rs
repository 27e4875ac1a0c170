//! Driver notification queries

use shared::models::{DriverNotification, DriverNotificationCreate};
use sqlx::PgPool;

const COLUMNS: &str = "id, driver_id, order_id, kind, message, read, created_at";

pub async fn create(
    pool: &PgPool,
    data: &DriverNotificationCreate,
) -> Result<DriverNotification, sqlx::Error> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query_as(&format!(
        r#"
        INSERT INTO driver_notifications (id, driver_id, order_id, kind, message, read, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.driver_id)
    .bind(&data.order_id)
    .bind(&data.kind)
    .bind(&data.message)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list_by_driver(
    pool: &PgPool,
    driver_id: &str,
) -> Result<Vec<DriverNotification>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM driver_notifications WHERE driver_id = $1 ORDER BY created_at DESC"
    ))
    .bind(driver_id)
    .fetch_all(pool)
    .await
}

pub async fn list_by_order(
    pool: &PgPool,
    order_id: &str,
) -> Result<Vec<DriverNotification>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM driver_notifications WHERE order_id = $1 ORDER BY created_at, id"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await
}
