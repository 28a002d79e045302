use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use ttb_common::Money;

//--------------------------------------      Customer       ---------------------------------------------------------
/// A dining customer, identified by an opaque, client-generated token.
///
/// Customers are created implicitly on their first order submission and never mutated or
/// deleted afterwards; completed orders keep referring to the token.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: i64,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatusType {
    /// The live, editable order a customer's submissions accumulate into.
    Open,
    /// The order has been archived. Terminal.
    Completed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Open => write!(f, "open"),
            OrderStatusType::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "completed" => Ok(Self::Completed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------    ItemStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatusType {
    /// Submitted by the customer, awaiting a kitchen decision.
    Pending,
    /// Accepted by the kitchen. Terminal.
    Confirmed,
    /// Declined by the kitchen. Terminal.
    Rejected,
}

impl ItemStatusType {
    /// Confirmed and rejected items never change state again, and resubmissions never merge
    /// into them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatusType::Confirmed | ItemStatusType::Rejected)
    }
}

impl Display for ItemStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatusType::Pending => write!(f, "pending"),
            ItemStatusType::Confirmed => write!(f, "confirmed"),
            ItemStatusType::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ItemStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------      MenuItem       ---------------------------------------------------------
/// A dish on the menu. `image_url` is a reference only; image storage is not handled here.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Payload for creating a menu item (or replacing one wholesale via PUT).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Partial menu item update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

//--------------------------------------        Order        ---------------------------------------------------------
/// An order row as stored. The wire representation with nested items is
/// [`crate::order_objects::FullOrder`].
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: String,
    pub name: String,
    pub table_number: String,
    pub mobile_number: Option<String>,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      OrderItem      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub status: ItemStatusType,
    /// Preparation time in minutes. Only meaningful on confirmed items.
    pub preparation_time: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------  OrderSubmission    ---------------------------------------------------------
/// A batch order submission from a table-side device. The aggregator merges it into the
/// customer's open order, creating one if necessary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub customer_id: String,
    pub name: String,
    pub table_number: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub items: Vec<LineRequest>,
}

impl OrderSubmission {
    pub fn new<S1: Into<String>, S2: Into<String>, S3: Into<String>>(customer_id: S1, name: S2, table_number: S3) -> Self {
        Self {
            customer_id: customer_id.into(),
            name: name.into(),
            table_number: table_number.into(),
            mobile_number: None,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, menu_item_id: i64, quantity: i64) -> Self {
        self.items.push(LineRequest { menu_item_id, quantity });
        self
    }
}

/// One (menu item, quantity) line of a submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineRequest {
    pub menu_item_id: i64,
    pub quantity: i64,
}

//--------------------------------------  ItemStatusUpdate   ---------------------------------------------------------
/// A kitchen decision on a single order item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemStatusUpdate {
    pub status: ItemStatusType,
    #[serde(default)]
    pub preparation_time: Option<i64>,
}

impl ItemStatusUpdate {
    pub fn confirmed(preparation_time: Option<i64>) -> Self {
        Self { status: ItemStatusType::Confirmed, preparation_time }
    }

    pub fn rejected() -> Self {
        Self { status: ItemStatusType::Rejected, preparation_time: None }
    }
}

//--------------------------------------   CompletedOrder    ---------------------------------------------------------
/// The immutable archive row written when an order is completed. Values are copied, not
/// referenced, so later menu edits leave the archive untouched.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedOrder {
    pub id: i64,
    pub order_id: i64,
    pub customer_id: String,
    pub name: String,
    pub table_number: String,
    pub mobile_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
