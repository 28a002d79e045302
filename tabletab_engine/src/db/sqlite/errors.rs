use thiserror::Error;

use crate::db_types::ItemStatusType;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database query error: {0}")]
    QueryError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Menu item {0} does not exist")]
    MenuItemNotFound(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order item {0} does not exist")]
    OrderItemNotFound(i64),
    #[error("Order {0} is not open")]
    OrderNotOpen(i64),
    #[error("Order item {0} is already {1}")]
    ItemAlreadyDecided(i64, ItemStatusType),
}
