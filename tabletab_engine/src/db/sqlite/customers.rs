use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::db_types::Customer;

/// Fetches the customer for the given identity token, creating the row if this is the
/// first submission from that token.
///
/// The create is a unique-constraint-backed upsert, so concurrent first-submissions from
/// the same token cannot produce duplicate customers.
pub async fn fetch_or_create_customer(
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<Customer, SqliteDatabaseError> {
    trace!("🧑️ Fetching or creating customer [{token}]");
    sqlx::query("INSERT INTO customers (customer_id, created_at) VALUES ($1, $2) ON CONFLICT (customer_id) DO NOTHING")
        .bind(token)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    let customer = sqlx::query_as("SELECT id, customer_id, created_at FROM customers WHERE customer_id = $1")
        .bind(token)
        .fetch_one(&mut *conn)
        .await?;
    Ok(customer)
}
