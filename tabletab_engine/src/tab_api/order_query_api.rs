//! `OrderQueryApi` is the read-only side: listing and fetching live and archived orders.
use std::fmt::Debug;

use crate::{
    db::traits::OrderQueries,
    order_objects::{CompletedOrderRepr, FullOrder, OrderQueryFilter},
    tab_api::errors::OrderQueryError,
};

pub struct OrderQueryApi<B> {
    db: B,
}

impl<B> Debug for OrderQueryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderQueryApi")
    }
}

impl<B> OrderQueryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderQueryApi<B>
where B: OrderQueries
{
    /// Orders matching the filter, newest first, each with its items embedded.
    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<FullOrder>, OrderQueryError> {
        self.db.search_orders(query).await
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError> {
        self.db.fetch_order(order_id).await
    }

    /// Archived orders, most recently completed first.
    pub async fn fetch_completed_orders(&self) -> Result<Vec<CompletedOrderRepr>, OrderQueryError> {
        self.db.fetch_completed_orders().await
    }

    /// Fetch one archived order by its original (live) order id.
    pub async fn fetch_completed_order(&self, order_id: i64) -> Result<Option<CompletedOrderRepr>, OrderQueryError> {
        self.db.fetch_completed_order(order_id).await
    }
}
