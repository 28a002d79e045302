//! TableTab order engine
//!
//! This library contains the core logic of the TableTab restaurant backend: the order
//! aggregator, the status lifecycle rules, the completed-order archive and the event
//! pub/sub machinery that fans every mutation out to connected observers.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@db`]). SQLite is the supported backend. You should never
//!    need to touch the database directly; go through the public API instead. The exception
//!    is the data types stored in the database, which live in [`db_types`] and are public.
//! 2. The engine public API ([`mod@tab_api`]): [`OrderFlowApi`] for every mutating
//!    operation (order submission, item confirmation/rejection, completion), [`MenuApi`]
//!    for menu CRUD, and [`OrderQueryApi`] for the read side. Backends implement the traits
//!    in [`mod@db`] to drive these APIs.
//!
//! Every mutating operation emits an event once its transaction has committed. A simple
//! actor setup in [`events`] lets callers hook into these events; the TableTab server uses
//! the hooks to feed its push channel.
mod db;

pub mod db_types;
pub mod events;
mod tab_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{db_url, new_pool, SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{MenuManagement, OrderFlowDatabase, OrderQueries};
pub use tab_api::{
    errors::{MenuApiError, OrderFlowError, OrderQueryError},
    menu_api::MenuApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    order_query_api::OrderQueryApi,
};
