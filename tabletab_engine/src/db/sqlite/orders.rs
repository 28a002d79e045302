use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{FromRow, QueryBuilder, SqliteConnection};
use ttb_common::Money;

use super::SqliteDatabaseError;
use crate::{
    db_types::{ItemStatusType, ItemStatusUpdate, MenuItem, Order, OrderItem, OrderSubmission},
    order_objects::{FullOrder, OrderItemRepr, OrderQueryFilter},
};

const ORDER_COLUMNS: &str = "id, customer_id, name, table_number, mobile_number, status, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, quantity, status, preparation_time, created_at, updated_at";

//--------------------------------------      Orders       -----------------------------------------------------------

/// Returns the customer's open order, if one exists. The schema's partial unique index
/// guarantees there is at most one.
pub async fn fetch_open_order_for_customer(
    token: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 AND status = 'open'"
    ))
    .bind(token)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn insert_order(
    submission: &OrderSubmission,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, SqliteDatabaseError> {
    let order: Order = sqlx::query_as(&format!(
        r#"
        INSERT INTO orders (customer_id, name, table_number, mobile_number, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'open', $5, $5)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(&submission.customer_id)
    .bind(&submission.name)
    .bind(&submission.table_number)
    .bind(&submission.mobile_number)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order #{} opened for customer [{}]", order.id, order.customer_id);
    Ok(order)
}

/// Overwrites the mutable metadata of an existing open order (last-write-wins).
pub async fn update_order_metadata(
    order_id: i64,
    submission: &OrderSubmission,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE orders SET name = $2, table_number = $3, mobile_number = $4, updated_at = $5 WHERE id = $1")
        .bind(order_id)
        .bind(&submission.name)
        .bind(&submission.table_number)
        .bind(&submission.mobile_number)
        .bind(now)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Marks an open order as completed. The status guard makes the transition atomic: a
/// second completion attempt matches no row.
pub async fn mark_order_completed(
    order_id: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Order, SqliteDatabaseError> {
    let updated: Option<Order> = sqlx::query_as(&format!(
        "UPDATE orders SET status = 'completed', updated_at = $2 WHERE id = $1 AND status = 'open' RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(order) => Ok(order),
        None => match fetch_order(order_id, conn).await? {
            Some(_) => Err(SqliteDatabaseError::OrderNotOpen(order_id)),
            None => Err(SqliteDatabaseError::OrderNotFound(order_id)),
        },
    }
}

/// Fetches orders according to the filter criteria, newest first.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders "));
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(status) = query.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(customer_id) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(customer_id);
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    let orders = builder.build_query_as().fetch_all(conn).await?;
    Ok(orders)
}

//--------------------------------------    Order items    -----------------------------------------------------------

/// Finds a *pending* item for the given menu item within the order, i.e. the merge target
/// for a resubmission. Terminal items are deliberately excluded.
pub async fn fetch_pending_item(
    order_id: i64,
    menu_item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, SqliteDatabaseError> {
    let item = sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 AND menu_item_id = $2 AND status = 'pending'"
    ))
    .bind(order_id)
    .bind(menu_item_id)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

pub async fn insert_order_item(
    order_id: i64,
    menu_item_id: i64,
    quantity: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, SqliteDatabaseError> {
    let item: OrderItem = sqlx::query_as(&format!(
        r#"
        INSERT INTO order_items (order_id, menu_item_id, quantity, status, created_at, updated_at)
        VALUES ($1, $2, $3, 'pending', $4, $4)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(order_id)
    .bind(menu_item_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(conn)
    .await?;
    trace!("📝️ New pending item #{} (menu item {menu_item_id} x{quantity}) on order #{order_id}", item.id);
    Ok(item)
}

pub async fn add_to_item_quantity(
    item_id: i64,
    quantity: i64,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, SqliteDatabaseError> {
    let item: OrderItem = sqlx::query_as(&format!(
        "UPDATE order_items SET quantity = quantity + $2, updated_at = $3 WHERE id = $1 RETURNING {ITEM_COLUMNS}"
    ))
    .bind(item_id)
    .bind(quantity)
    .bind(now)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Merged into item #{item_id}, quantity is now {}", item.quantity);
    Ok(item)
}

pub async fn fetch_order_item(
    item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, SqliteDatabaseError> {
    let item = sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE id = $1"))
        .bind(item_id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

/// Applies a kitchen decision to a pending item. The `status = 'pending'` guard makes the
/// transition atomic; when no row matches, the follow-up read distinguishes a missing item
/// from one that has already been decided.
pub async fn apply_item_status(
    item_id: i64,
    update: ItemStatusUpdate,
    now: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, SqliteDatabaseError> {
    let preparation_time = match update.status {
        ItemStatusType::Confirmed => update.preparation_time,
        _ => None,
    };
    let updated: Option<OrderItem> = sqlx::query_as(&format!(
        r#"
        UPDATE order_items SET status = $2, preparation_time = $3, updated_at = $4
        WHERE id = $1 AND status = 'pending'
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item_id)
    .bind(update.status)
    .bind(preparation_time)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;
    match updated {
        Some(item) => {
            debug!("📝️ Item #{item_id} is now {}, preparation time {:?}", item.status, item.preparation_time);
            Ok(item)
        },
        None => match fetch_order_item(item_id, conn).await? {
            Some(item) => Err(SqliteDatabaseError::ItemAlreadyDecided(item_id, item.status)),
            None => Err(SqliteDatabaseError::OrderItemNotFound(item_id)),
        },
    }
}

//--------------------------------------  Representations  -----------------------------------------------------------

#[derive(FromRow)]
struct ItemWithMenuRow {
    id: i64,
    order_id: i64,
    menu_item_id: i64,
    quantity: i64,
    status: ItemStatusType,
    preparation_time: Option<i64>,
    name: String,
    price: Money,
    image_url: Option<String>,
    is_available: bool,
}

impl From<ItemWithMenuRow> for OrderItemRepr {
    fn from(row: ItemWithMenuRow) -> Self {
        Self {
            id: row.id,
            menu_item: MenuItem {
                id: row.menu_item_id,
                name: row.name,
                price: row.price,
                image_url: row.image_url,
                is_available: row.is_available,
            },
            quantity: row.quantity,
            status: row.status,
            preparation_time: row.preparation_time,
            order: row.order_id,
        }
    }
}

/// Fetches an order's items with their menu items embedded, in insertion order.
pub async fn fetch_items_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItemRepr>, SqliteDatabaseError> {
    let rows: Vec<ItemWithMenuRow> = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.status, oi.preparation_time,
               m.name, m.price, m.image_url, m.is_available
        FROM order_items oi INNER JOIN menu_items m ON m.id = oi.menu_item_id
        WHERE oi.order_id = $1
        ORDER BY oi.id
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(OrderItemRepr::from).collect())
}

/// Fetches a single item with its menu item embedded.
pub async fn fetch_item_repr(
    item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItemRepr>, SqliteDatabaseError> {
    let row: Option<ItemWithMenuRow> = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.status, oi.preparation_time,
               m.name, m.price, m.image_url, m.is_available
        FROM order_items oi INNER JOIN menu_items m ON m.id = oi.menu_item_id
        WHERE oi.id = $1
        "#,
    )
    .bind(item_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.map(OrderItemRepr::from))
}

pub fn full_order_from(order: Order, items: Vec<OrderItemRepr>) -> FullOrder {
    FullOrder {
        id: order.id,
        name: order.name,
        table_number: order.table_number,
        mobile_number: order.mobile_number,
        items,
        created_at: order.created_at,
        customer_id: order.customer_id,
        status: order.status,
    }
}

/// Re-reads the complete, authoritative order representation.
pub async fn fetch_full_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<FullOrder>, SqliteDatabaseError> {
    let order = match fetch_order(order_id, conn).await? {
        Some(o) => o,
        None => return Ok(None),
    };
    let items = fetch_items_for_order(order_id, conn).await?;
    Ok(Some(full_order_from(order, items)))
}
