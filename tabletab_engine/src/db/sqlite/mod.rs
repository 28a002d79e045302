//! # SQLite database methods
//!
//! This module contains the "low-level" SQLite interactions. They are maintained as simple
//! functions (rather than stateful structs) that accept a `&mut SqliteConnection` argument.
//! Callers can obtain a connection from a pool, or open a transaction as the need arises
//! and pass `&mut *tx` through without any other changes.
pub mod completed_orders;
pub mod customers;
mod db;
mod errors;
pub mod menu;
pub mod orders;

use std::{env, str::FromStr, time::Duration};

pub use db::SqliteDatabase;
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

const SQLITE_DB_URL: &str = "sqlite://data/tabletab_store.db";

pub fn db_url() -> String {
    let result = env::var("TTB_DATABASE_URL").unwrap_or_else(|_| {
        info!("TTB_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    // WAL lets readers run alongside the single writer, and the busy timeout queues
    // contending write transactions instead of surfacing SQLITE_BUSY to callers.
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10));
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
