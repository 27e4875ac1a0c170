//! Customer, driver and template lookups (read-only)

use shared::models::{Customer, Driver, MessageTemplate};
use sqlx::PgPool;

pub async fn get_customer(
    pool: &PgPool,
    customer_id: &str,
) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, phone FROM customers WHERE id = $1")
        .bind(customer_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_available_drivers(pool: &PgPool) -> Result<Vec<Driver>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, phone, is_available FROM drivers WHERE is_available = TRUE ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_template(
    pool: &PgPool,
    status_key: &str,
) -> Result<Option<MessageTemplate>, sqlx::Error> {
    sqlx::query_as("SELECT status_key, body, updated_at FROM message_templates WHERE status_key = $1")
        .bind(status_key)
        .fetch_optional(pool)
        .await
}
