use mockall::mock;
use tabletab_engine::{
    db_types::{ItemStatusUpdate, MenuItem, MenuItemUpdate, NewMenuItem, OrderSubmission},
    order_objects::{ArchiveOutcome, CompletedOrderRepr, FullOrder, OrderItemRepr, OrderQueryFilter, SubmissionOutcome},
    MenuApiError,
    MenuManagement,
    OrderFlowDatabase,
    OrderFlowError,
    OrderQueries,
    OrderQueryError,
};

mock! {
    pub OrderFlow {}
    impl Clone for OrderFlow {
        fn clone(&self) -> Self;
    }
    impl OrderFlowDatabase for OrderFlow {
        async fn submit_order(&self, submission: OrderSubmission) -> Result<SubmissionOutcome, OrderFlowError>;
        async fn update_item_status(&self, item_id: i64, update: ItemStatusUpdate) -> Result<OrderItemRepr, OrderFlowError>;
        async fn complete_order(&self, order_id: i64) -> Result<ArchiveOutcome, OrderFlowError>;
    }
}

mock! {
    pub MenuManager {}
    impl MenuManagement for MenuManager {
        async fn insert_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuApiError>;
        async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, MenuApiError>;
        async fn replace_menu_item(&self, id: i64, item: NewMenuItem) -> Result<MenuItem, MenuApiError>;
        async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError>;
        async fn fetch_menu_items(&self) -> Result<Vec<MenuItem>, MenuApiError>;
    }
}

mock! {
    pub OrderQuery {}
    impl OrderQueries for OrderQuery {
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<FullOrder>, OrderQueryError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError>;
        async fn fetch_completed_orders(&self) -> Result<Vec<CompletedOrderRepr>, OrderQueryError>;
        async fn fetch_completed_order(&self, order_id: i64) -> Result<Option<CompletedOrderRepr>, OrderQueryError>;
    }
}
