//! `SqliteDatabase` is the concrete SQLite backend for the TableTab engine. It implements
//! all the storage traits defined in the [`crate::db::traits`] module.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::{pool::PoolConnection, Sqlite, SqliteConnection, SqlitePool};

use super::{completed_orders, customers, menu, new_pool, orders, SqliteDatabaseError};
use crate::{
    db::traits::{MenuManagement, OrderFlowDatabase, OrderQueries},
    db_types::{ItemStatusUpdate, MenuItem, MenuItemUpdate, NewMenuItem, OrderSubmission},
    order_objects::{
        ArchiveOutcome,
        CompletedOrderRepr,
        FullOrder,
        OrderItemRepr,
        OrderQueryFilter,
        SubmissionOutcome,
    },
    tab_api::errors::{MenuApiError, OrderFlowError, OrderQueryError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Opens a write transaction in immediate mode. The write lock is taken up front, so
    /// contending writers queue on the connection's busy timeout; a deferred transaction
    /// that upgrades from read to write mid-flight fails with SQLITE_BUSY instead.
    async fn begin_write(&self) -> Result<PoolConnection<Sqlite>, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        Ok(conn)
    }

    /// Commits the write transaction on success, rolls it back on failure. Nothing is
    /// visible to other connections until this returns `Ok`.
    async fn finish_write<T, E>(mut conn: PoolConnection<Sqlite>, result: Result<T, E>) -> Result<T, E>
    where E: From<SqliteDatabaseError> {
        match result {
            Ok(value) => {
                sqlx::query("COMMIT").execute(&mut *conn).await.map_err(SqliteDatabaseError::from)?;
                Ok(value)
            },
            Err(e) => {
                if let Err(re) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    warn!("🗃️ Could not roll back a failed write transaction: {re}");
                }
                Err(e)
            },
        }
    }
}

impl OrderFlowDatabase for SqliteDatabase {
    /// The whole submission is one write transaction: resolve-or-create the customer,
    /// locate or create the open order, overwrite its metadata, merge or insert each line.
    /// Any failure rolls everything back, including a just-created customer.
    async fn submit_order(&self, submission: OrderSubmission) -> Result<SubmissionOutcome, OrderFlowError> {
        let mut conn = self.begin_write().await.map_err(OrderFlowError::from)?;
        let result = submit_order_in_tx(&submission, &mut conn).await;
        Self::finish_write(conn, result).await
    }

    async fn update_item_status(&self, item_id: i64, update: ItemStatusUpdate) -> Result<OrderItemRepr, OrderFlowError> {
        let mut conn = self.begin_write().await.map_err(OrderFlowError::from)?;
        let result = update_item_status_in_tx(item_id, update, &mut conn).await;
        Self::finish_write(conn, result).await
    }

    /// Completion is one write transaction: close the live order (status-guarded), then
    /// copy the order and its items by value into the archive. Closing first means no
    /// submission can add items to the order while the snapshot is being taken.
    async fn complete_order(&self, order_id: i64) -> Result<ArchiveOutcome, OrderFlowError> {
        let mut conn = self.begin_write().await.map_err(OrderFlowError::from)?;
        let result = complete_order_in_tx(order_id, &mut conn).await;
        Self::finish_write(conn, result).await
    }
}

async fn submit_order_in_tx(
    submission: &OrderSubmission,
    conn: &mut SqliteConnection,
) -> Result<SubmissionOutcome, OrderFlowError> {
    let referenced: Vec<i64> = submission.items.iter().map(|l| l.menu_item_id).collect();
    if let Some(missing) = menu::first_unknown_menu_item(&referenced, conn).await? {
        return Err(OrderFlowError::MenuItemNotFound(missing));
    }

    let customer = customers::fetch_or_create_customer(&submission.customer_id, conn).await?;
    let now = Utc::now();
    let order = match orders::fetch_open_order_for_customer(&customer.customer_id, conn).await? {
        Some(order) => {
            orders::update_order_metadata(order.id, submission, now, conn).await?;
            debug!("🗃️ Updated open order #{} for customer [{}]", order.id, customer.customer_id);
            order
        },
        None => orders::insert_order(submission, now, conn).await?,
    };

    let mut touched_item_ids = Vec::with_capacity(submission.items.len());
    for line in &submission.items {
        let item = match orders::fetch_pending_item(order.id, line.menu_item_id, conn).await? {
            Some(existing) => orders::add_to_item_quantity(existing.id, line.quantity, now, conn).await?,
            None => orders::insert_order_item(order.id, line.menu_item_id, line.quantity, now, conn).await?,
        };
        touched_item_ids.push(item.id);
    }

    // Re-read the post-state inside the transaction so the caller sees every item, not
    // just the ones this submission touched.
    let order = orders::fetch_full_order(order.id, conn).await?.ok_or(OrderFlowError::OrderNotFound(order.id))?;
    Ok(SubmissionOutcome { order, touched_item_ids })
}

async fn update_item_status_in_tx(
    item_id: i64,
    update: ItemStatusUpdate,
    conn: &mut SqliteConnection,
) -> Result<OrderItemRepr, OrderFlowError> {
    let item = orders::apply_item_status(item_id, update, Utc::now(), conn).await?;
    let repr = orders::fetch_item_repr(item.id, conn).await?.ok_or(OrderFlowError::OrderItemNotFound(item_id))?;
    Ok(repr)
}

async fn complete_order_in_tx(order_id: i64, conn: &mut SqliteConnection) -> Result<ArchiveOutcome, OrderFlowError> {
    let now = Utc::now();
    let order = orders::mark_order_completed(order_id, now, conn).await?;
    let completed = completed_orders::insert_completed_order(&order, now, conn).await?;
    let copied = completed_orders::copy_items_into_archive(completed.id, order.id, conn).await?;
    debug!("🗃️ Archived order #{order_id} with {copied} items");
    let completed = completed_orders::fetch_completed_order_repr(completed, conn).await?;
    let items = orders::fetch_items_for_order(order.id, conn).await?;
    let order = orders::full_order_from(order, items);
    Ok(ArchiveOutcome { completed, order })
}

impl MenuManagement for SqliteDatabase {
    async fn insert_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuApiError> {
        let mut conn = self.begin_write().await.map_err(MenuApiError::from)?;
        let result = menu::insert_menu_item(item, &mut conn).await.map_err(MenuApiError::from);
        Self::finish_write(conn, result).await
    }

    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, MenuApiError> {
        let mut conn = self.begin_write().await.map_err(MenuApiError::from)?;
        let result = menu::update_menu_item(id, update, &mut conn).await.map_err(MenuApiError::from);
        Self::finish_write(conn, result).await
    }

    async fn replace_menu_item(&self, id: i64, item: NewMenuItem) -> Result<MenuItem, MenuApiError> {
        let mut conn = self.begin_write().await.map_err(MenuApiError::from)?;
        let result = menu::replace_menu_item(id, item, &mut conn).await.map_err(MenuApiError::from);
        Self::finish_write(conn, result).await
    }

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let item = menu::fetch_menu_item(id, &mut conn).await?;
        Ok(item)
    }

    async fn fetch_menu_items(&self) -> Result<Vec<MenuItem>, MenuApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let items = menu::fetch_menu_items(&mut conn).await?;
        Ok(items)
    }
}

impl OrderQueries for SqliteDatabase {
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<FullOrder>, OrderQueryError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let matching = orders::search_orders(query, &mut conn).await?;
        let mut result = Vec::with_capacity(matching.len());
        for order in matching {
            let items = orders::fetch_items_for_order(order.id, &mut conn).await?;
            result.push(orders::full_order_from(order, items));
        }
        Ok(result)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let order = orders::fetch_full_order(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_completed_orders(&self) -> Result<Vec<CompletedOrderRepr>, OrderQueryError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let completed = completed_orders::fetch_completed_orders(&mut conn).await?;
        Ok(completed)
    }

    async fn fetch_completed_order(&self, order_id: i64) -> Result<Option<CompletedOrderRepr>, OrderQueryError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let completed = completed_orders::fetch_completed_order_by_order_id(order_id, &mut conn).await?;
        Ok(completed)
    }
}
