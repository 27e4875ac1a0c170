//! Order queries

use shared::models::{Order, OrderUpdate};
use sqlx::PgPool;

const ORDER_COLUMNS: &str = "id, order_number, status, customer_id, total_amount, delivery_address, delivery_date, delivery_time, notes, created_at, updated_at";

pub async fn get(pool: &PgPool, order_id: &str) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(order_id)
        .fetch_optional(pool)
        .await
}

/// Partial update, `None` fields keep their value. Returns the updated row.
pub async fn update(
    pool: &PgPool,
    order_id: &str,
    data: &OrderUpdate,
) -> Result<Option<Order>, sqlx::Error> {
    let now = shared::util::now_millis();
    sqlx::query_as(&format!(
        r#"
        UPDATE orders SET
            status = COALESCE($1, status),
            delivery_address = COALESCE($2, delivery_address),
            delivery_date = COALESCE($3, delivery_date),
            delivery_time = COALESCE($4, delivery_time),
            notes = COALESCE($5, notes),
            updated_at = $6
        WHERE id = $7
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(&data.status)
    .bind(&data.delivery_address)
    .bind(&data.delivery_date)
    .bind(&data.delivery_time)
    .bind(&data.notes)
    .bind(now)
    .bind(order_id)
    .fetch_optional(pool)
    .await
}
