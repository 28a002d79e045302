//! Wire representations of orders and the read-side query filter.
//!
//! These are the shapes that go into API responses and push-channel events. They are
//! denormalized: an order carries all its items, and every item embeds its menu item.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ttb_common::Money;

use crate::db_types::{ItemStatusType, MenuItem, OrderStatusType};

/// One line item of an order, with its menu item embedded. `order` is the owning order id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRepr {
    pub id: i64,
    pub menu_item: MenuItem,
    pub quantity: i64,
    pub status: ItemStatusType,
    pub preparation_time: Option<i64>,
    pub order: i64,
}

/// The authoritative representation of an order, items included. This is what submissions
/// return and what the order-changed event carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullOrder {
    pub id: i64,
    pub name: String,
    pub table_number: String,
    pub mobile_number: Option<String>,
    pub items: Vec<OrderItemRepr>,
    pub created_at: DateTime<Utc>,
    pub customer_id: String,
    pub status: OrderStatusType,
}

impl FullOrder {
    pub fn item(&self, item_id: i64) -> Option<&OrderItemRepr> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

/// An archived order. `order_id` is the id of the original (still retrievable) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedOrderRepr {
    pub order_id: i64,
    pub customer_id: String,
    pub name: String,
    pub table_number: String,
    pub mobile_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub items: Vec<CompletedOrderItemRepr>,
}

/// An archived line item. Name and price were copied by value at completion time.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CompletedOrderItemRepr {
    pub id: i64,
    pub menu_item_name: String,
    pub quantity: i64,
    pub price: Money,
    pub status: ItemStatusType,
}

/// What a committed submission produced: the post-state of the order, plus the ids of the
/// items this submission created or merged into (for event publication).
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub order: FullOrder,
    pub touched_item_ids: Vec<i64>,
}

/// What a committed completion produced: the archive record and the (now completed) live
/// order, the latter for the order-changed event.
#[derive(Debug, Clone)]
pub struct ArchiveOutcome {
    pub completed: CompletedOrderRepr,
    pub order: FullOrder,
}

/// Read-side order filter. Orders are always returned newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub status: Option<OrderStatusType>,
    pub customer_id: Option<String>,
}

impl OrderQueryFilter {
    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_customer_id<S: Into<String>>(mut self, customer_id: S) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.customer_id.is_none()
    }
}
