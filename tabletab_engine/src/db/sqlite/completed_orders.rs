use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::{
    db_types::{CompletedOrder, Order},
    order_objects::{CompletedOrderItemRepr, CompletedOrderRepr},
};

const COMPLETED_COLUMNS: &str = "id, order_id, customer_id, name, table_number, mobile_number, created_at, completed_at";

/// Writes the archive row for an order being completed. The original creation timestamp is
/// copied; `completed_at` is now.
pub async fn insert_completed_order(
    order: &Order,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<CompletedOrder, SqliteDatabaseError> {
    let completed: CompletedOrder = sqlx::query_as(&format!(
        r#"
        INSERT INTO completed_orders (order_id, customer_id, name, table_number, mobile_number, created_at, completed_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COMPLETED_COLUMNS}
        "#
    ))
    .bind(order.id)
    .bind(&order.customer_id)
    .bind(&order.name)
    .bind(&order.table_number)
    .bind(&order.mobile_number)
    .bind(order.created_at)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗂️ Archive record #{} created for order #{}", completed.id, order.id);
    Ok(completed)
}

/// Copies every current item of the order into the archive, by value: the menu item's name
/// and price as they stand right now, so later menu edits cannot rewrite history.
pub async fn copy_items_into_archive(
    completed_order_id: i64,
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
        INSERT INTO completed_order_items (completed_order_id, menu_item_name, quantity, price, status)
        SELECT $1, m.name, oi.quantity, m.price, oi.status
        FROM order_items oi INNER JOIN menu_items m ON m.id = oi.menu_item_id
        WHERE oi.order_id = $2
        ORDER BY oi.id
        "#,
    )
    .bind(completed_order_id)
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn fetch_items_for_completed_order(
    completed_order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<CompletedOrderItemRepr>, SqliteDatabaseError> {
    let items = sqlx::query_as(
        "SELECT id, menu_item_name, quantity, price, status FROM completed_order_items WHERE completed_order_id = $1 ORDER BY id",
    )
    .bind(completed_order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

fn repr_from(completed: CompletedOrder, items: Vec<CompletedOrderItemRepr>) -> CompletedOrderRepr {
    CompletedOrderRepr {
        order_id: completed.order_id,
        customer_id: completed.customer_id,
        name: completed.name,
        table_number: completed.table_number,
        mobile_number: completed.mobile_number,
        created_at: completed.created_at,
        completed_at: completed.completed_at,
        items,
    }
}

pub async fn fetch_completed_order_repr(
    completed: CompletedOrder,
    conn: &mut SqliteConnection,
) -> Result<CompletedOrderRepr, SqliteDatabaseError> {
    let items = fetch_items_for_completed_order(completed.id, conn).await?;
    Ok(repr_from(completed, items))
}

/// All archived orders, newest completion first.
pub async fn fetch_completed_orders(conn: &mut SqliteConnection) -> Result<Vec<CompletedOrderRepr>, SqliteDatabaseError> {
    let completed: Vec<CompletedOrder> =
        sqlx::query_as(&format!("SELECT {COMPLETED_COLUMNS} FROM completed_orders ORDER BY completed_at DESC, id DESC"))
            .fetch_all(&mut *conn)
            .await?;
    let mut result = Vec::with_capacity(completed.len());
    for record in completed {
        result.push(fetch_completed_order_repr(record, conn).await?);
    }
    Ok(result)
}

/// Fetches one archive record by the original order id.
pub async fn fetch_completed_order_by_order_id(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CompletedOrderRepr>, SqliteDatabaseError> {
    let completed: Option<CompletedOrder> =
        sqlx::query_as(&format!("SELECT {COMPLETED_COLUMNS} FROM completed_orders WHERE order_id = $1"))
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?;
    match completed {
        Some(record) => Ok(Some(fetch_completed_order_repr(record, conn).await?)),
        None => Ok(None),
    }
}
