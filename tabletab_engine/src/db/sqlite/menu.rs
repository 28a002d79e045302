use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use super::SqliteDatabaseError;
use crate::db_types::{MenuItem, MenuItemUpdate, NewMenuItem};

const MENU_COLUMNS: &str = "id, name, price, image_url, is_available";

pub async fn insert_menu_item(item: NewMenuItem, conn: &mut SqliteConnection) -> Result<MenuItem, SqliteDatabaseError> {
    let now = Utc::now();
    let inserted: MenuItem = sqlx::query_as(
        r#"
        INSERT INTO menu_items (name, price, image_url, is_available, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, name, price, image_url, is_available
        "#,
    )
    .bind(item.name)
    .bind(item.price)
    .bind(item.image_url)
    .bind(item.is_available)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🍽️ Menu item [{}] created with id {}", inserted.name, inserted.id);
    Ok(inserted)
}

/// Applies a partial update. Absent fields keep their current values. Returns the item as
/// updated, or a not-found error.
pub async fn update_menu_item(
    id: i64,
    update: MenuItemUpdate,
    conn: &mut SqliteConnection,
) -> Result<MenuItem, SqliteDatabaseError> {
    let updated = sqlx::query_as(
        r#"
        UPDATE menu_items SET
            name = COALESCE($2, name),
            price = COALESCE($3, price),
            image_url = COALESCE($4, image_url),
            is_available = COALESCE($5, is_available),
            updated_at = $6
        WHERE id = $1
        RETURNING id, name, price, image_url, is_available
        "#,
    )
    .bind(id)
    .bind(update.name)
    .bind(update.price)
    .bind(update.image_url)
    .bind(update.is_available)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    updated.ok_or(SqliteDatabaseError::MenuItemNotFound(id))
}

/// Overwrites every mutable field (PUT semantics), including clearing the image reference.
pub async fn replace_menu_item(
    id: i64,
    item: NewMenuItem,
    conn: &mut SqliteConnection,
) -> Result<MenuItem, SqliteDatabaseError> {
    let updated = sqlx::query_as(
        r#"
        UPDATE menu_items SET name = $2, price = $3, image_url = $4, is_available = $5, updated_at = $6
        WHERE id = $1
        RETURNING id, name, price, image_url, is_available
        "#,
    )
    .bind(id)
    .bind(item.name)
    .bind(item.price)
    .bind(item.image_url)
    .bind(item.is_available)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;
    updated.ok_or(SqliteDatabaseError::MenuItemNotFound(id))
}

pub async fn fetch_menu_item(id: i64, conn: &mut SqliteConnection) -> Result<Option<MenuItem>, SqliteDatabaseError> {
    let item = sqlx::query_as(&format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

pub async fn fetch_menu_items(conn: &mut SqliteConnection) -> Result<Vec<MenuItem>, SqliteDatabaseError> {
    let items = sqlx::query_as(&format!("SELECT {MENU_COLUMNS} FROM menu_items ORDER BY id")).fetch_all(conn).await?;
    Ok(items)
}

/// Validation helper for submissions: returns the first referenced menu item id that does
/// not exist, or `None` when all references are valid.
pub async fn first_unknown_menu_item(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Option<i64>, SqliteDatabaseError> {
    for &id in ids {
        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM menu_items WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
        if exists.is_none() {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
