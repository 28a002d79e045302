use crate::{
    order_objects::{CompletedOrderRepr, FullOrder, OrderQueryFilter},
    tab_api::errors::OrderQueryError,
};

/// The read side: listing and fetching live and archived orders.
#[allow(async_fn_in_trait)]
pub trait OrderQueries {
    /// Fetch orders matching the filter, newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<FullOrder>, OrderQueryError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError>;

    /// Archived orders, newest completion first.
    async fn fetch_completed_orders(&self) -> Result<Vec<CompletedOrderRepr>, OrderQueryError>;

    /// Fetch one archive record by the *original* order id.
    async fn fetch_completed_order(&self, order_id: i64) -> Result<Option<CompletedOrderRepr>, OrderQueryError>;
}
