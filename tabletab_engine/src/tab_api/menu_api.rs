//! `MenuApi` manages the restaurant's menu catalogue.
use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::MenuManagement,
    db_types::{MenuItem, MenuItemUpdate, NewMenuItem},
    tab_api::errors::MenuApiError,
};

pub struct MenuApi<B> {
    db: B,
}

impl<B> Debug for MenuApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MenuApi")
    }
}

impl<B> MenuApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> MenuApi<B>
where B: MenuManagement
{
    /// Create a new menu item. Items default to available when the flag is omitted.
    pub async fn create_menu_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuApiError> {
        if item.name.trim().is_empty() {
            return Err(MenuApiError::ValidationError("menu item name must not be empty".to_string()));
        }
        let item = self.db.insert_menu_item(item).await?;
        info!("🍽️ Menu item #{} [{}] added to the menu", item.id, item.name);
        Ok(item)
    }

    /// Partially update a menu item. Fields absent from the update are left unchanged.
    pub async fn update_menu_item(&self, id: i64, update: MenuItemUpdate) -> Result<MenuItem, MenuApiError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(MenuApiError::ValidationError("menu item name must not be empty".to_string()));
            }
        }
        self.db.update_menu_item(id, update).await
    }

    /// Replace a menu item wholesale. Absent optional fields are cleared.
    pub async fn replace_menu_item(&self, id: i64, item: NewMenuItem) -> Result<MenuItem, MenuApiError> {
        if item.name.trim().is_empty() {
            return Err(MenuApiError::ValidationError("menu item name must not be empty".to_string()));
        }
        self.db.replace_menu_item(id, item).await
    }

    pub async fn fetch_menu_item(&self, id: i64) -> Result<Option<MenuItem>, MenuApiError> {
        self.db.fetch_menu_item(id).await
    }

    /// The full menu, including currently unavailable items, in creation order.
    pub async fn fetch_menu_items(&self) -> Result<Vec<MenuItem>, MenuApiError> {
        self.db.fetch_menu_items().await
    }
}
