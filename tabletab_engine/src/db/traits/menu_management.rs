use crate::{
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem},
    tab_api::errors::MenuApiError,
};

/// Menu CRUD. There is deliberately no delete; availability is toggled instead.
#[allow(async_fn_in_trait)]
pub trait MenuManagement {
    async fn insert_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuApiError>;

    /// Partial update. Absent fields keep their current values.
    async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, MenuApiError>;

    /// Full replacement (PUT semantics).
    async fn replace_menu_item(&self, id: i64, item: NewMenuItem) -> Result<MenuItem, MenuApiError>;

    async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError>;

    async fn fetch_menu_items(&self) -> Result<Vec<MenuItem>, MenuApiError>;
}
