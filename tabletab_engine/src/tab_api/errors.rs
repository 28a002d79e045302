use thiserror::Error;

use crate::db_types::ItemStatusType;

#[derive(Debug, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Menu item {0} does not exist")]
    MenuItemNotFound(i64),
    #[error("Order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order item {0} does not exist")]
    OrderItemNotFound(i64),
    #[error("Order {0} has already been completed")]
    OrderNotOpen(i64),
    #[error("Order item {0} is already {1} and cannot change status")]
    ItemAlreadyDecided(i64, ItemStatusType),
    #[error("Invalid submission: {0}")]
    ValidationError(String),
}

#[derive(Debug, Error)]
pub enum MenuApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Menu item {0} does not exist")]
    MenuItemNotFound(i64),
    #[error("Invalid menu item: {0}")]
    ValidationError(String),
}

#[derive(Debug, Error)]
pub enum OrderQueryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(feature = "sqlite")]
mod sqlite_conversions {
    use super::*;
    use crate::db::sqlite::SqliteDatabaseError;

    impl From<SqliteDatabaseError> for OrderFlowError {
        fn from(e: SqliteDatabaseError) -> Self {
            match e {
                SqliteDatabaseError::MenuItemNotFound(id) => Self::MenuItemNotFound(id),
                SqliteDatabaseError::OrderNotFound(id) => Self::OrderNotFound(id),
                SqliteDatabaseError::OrderItemNotFound(id) => Self::OrderItemNotFound(id),
                SqliteDatabaseError::OrderNotOpen(id) => Self::OrderNotOpen(id),
                SqliteDatabaseError::ItemAlreadyDecided(id, status) => Self::ItemAlreadyDecided(id, status),
                e => Self::DatabaseError(e.to_string()),
            }
        }
    }

    impl From<SqliteDatabaseError> for MenuApiError {
        fn from(e: SqliteDatabaseError) -> Self {
            match e {
                SqliteDatabaseError::MenuItemNotFound(id) => Self::MenuItemNotFound(id),
                e => Self::DatabaseError(e.to_string()),
            }
        }
    }

    impl From<SqliteDatabaseError> for OrderQueryError {
        fn from(e: SqliteDatabaseError) -> Self {
            Self::DatabaseError(e.to_string())
        }
    }
}
