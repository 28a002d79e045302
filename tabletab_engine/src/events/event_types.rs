use serde::{Deserialize, Serialize};

use crate::order_objects::{FullOrder, OrderItemRepr};

/// Emitted whenever an order is created or mutated, including the completion transition.
/// Carries the full current representation, not a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderChangedEvent {
    pub order: FullOrder,
}

impl OrderChangedEvent {
    pub fn new(order: FullOrder) -> Self {
        Self { order }
    }
}

/// Emitted whenever an order item is created, merged into, or transitioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemChangedEvent {
    pub order_item: OrderItemRepr,
}

impl OrderItemChangedEvent {
    pub fn new(order_item: OrderItemRepr) -> Self {
        Self { order_item }
    }
}

/// Emitted once when an order is archived. Carries identifiers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCompletedEvent {
    pub order_id: i64,
    pub customer_id: String,
}

impl OrderCompletedEvent {
    pub fn new(order_id: i64, customer_id: String) -> Self {
        Self { order_id, customer_id }
    }
}

/// The wire envelope delivered over the push channel. One frame per mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    OrderNotification { order: FullOrder },
    OrderItemNotification { order_item: OrderItemRepr },
    OrderCompletedNotification { order_id: i64, customer_id: String },
}

impl From<OrderChangedEvent> for OrderEvent {
    fn from(ev: OrderChangedEvent) -> Self {
        Self::OrderNotification { order: ev.order }
    }
}

impl From<OrderItemChangedEvent> for OrderEvent {
    fn from(ev: OrderItemChangedEvent) -> Self {
        Self::OrderItemNotification { order_item: ev.order_item }
    }
}

impl From<OrderCompletedEvent> for OrderEvent {
    fn from(ev: OrderCompletedEvent) -> Self {
        Self::OrderCompletedNotification { order_id: ev.order_id, customer_id: ev.customer_id }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn completed_envelope_carries_ids_only() {
        let ev = OrderEvent::from(OrderCompletedEvent::new(42, "c1".to_string()));
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "order_completed_notification", "order_id": 42, "customer_id": "c1"})
        );
    }
}
