//! `OrderFlowApi` is the primary write-side API: customers submit orders, the kitchen
//! confirms or rejects individual items, and staff complete orders into the archive.
//!
//! Every successful mutation is announced on the event hooks *after* it has been
//! committed, so subscribers only ever see durable state.
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use log::*;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    db::traits::OrderFlowDatabase,
    db_types::{ItemStatusType, ItemStatusUpdate, OrderSubmission},
    events::{EventProducers, OrderChangedEvent, OrderCompletedEvent, OrderItemChangedEvent},
    order_objects::{CompletedOrderRepr, FullOrder, OrderItemRepr},
    tab_api::errors::OrderFlowError,
};

/// A registry of per-customer submission locks.
///
/// Submissions from the same customer must be serialised, otherwise two concurrent
/// submissions can both miss the pending merge target and insert duplicate lines. Different
/// customers never contend with each other.
#[derive(Default, Clone)]
pub struct CustomerLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl CustomerLocks {
    pub async fn acquire(&self, customer_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.locks.lock().await;
            registry.entry(customer_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}

pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
    locks: CustomerLocks,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers, locks: CustomerLocks::default() }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderFlowDatabase
{
    /// Submit an order on behalf of a customer.
    ///
    /// If the customer already has an open order, the submission folds into it: order
    /// metadata is overwritten and each line either merges into an existing pending item
    /// for the same menu item (quantities add up) or becomes a new pending item. Items the
    /// kitchen has already decided are never touched.
    ///
    /// On success, one order-changed event is published, plus one item-changed event per
    /// line in the submission.
    pub async fn submit_order(&self, submission: OrderSubmission) -> Result<FullOrder, OrderFlowError> {
        validate_submission(&submission)?;
        let customer_id = submission.customer_id.clone();
        let _guard = self.locks.acquire(&customer_id).await;
        let outcome = self.db.submit_order(submission).await?;
        debug!(
            "🍽️ Submission for customer [{customer_id}] landed on order #{}, touching {} items",
            outcome.order.id,
            outcome.touched_item_ids.len()
        );
        self.call_order_changed_hook(&outcome.order).await;
        for item_id in &outcome.touched_item_ids {
            match outcome.order.item(*item_id) {
                Some(item) => self.call_item_changed_hook(item).await,
                None => error!("🍽️ Item #{item_id} was touched by the submission but is missing from the result"),
            }
        }
        Ok(outcome.order)
    }

    /// Apply a kitchen decision to a single pending order item.
    ///
    /// Only `confirmed` and `rejected` are accepted, and only while the item is still
    /// pending; a second decision on the same item is an error. A preparation time may
    /// accompany a confirmation and is discarded on rejection.
    pub async fn update_item_status(
        &self,
        item_id: i64,
        update: ItemStatusUpdate,
    ) -> Result<OrderItemRepr, OrderFlowError> {
        if update.status == ItemStatusType::Pending {
            return Err(OrderFlowError::ValidationError("an item cannot be moved back to pending".to_string()));
        }
        let item = self.db.update_item_status(item_id, update).await?;
        debug!("🍽️ Item #{item_id} on order #{} is now {}", item.order, item.status);
        self.call_item_changed_hook(&item).await;
        Ok(item)
    }

    /// Complete an open order, snapshotting it into the archive.
    ///
    /// The live order is closed and a by-value copy (names and prices as they stand right
    /// now) is written to the completed-orders store. Completing an order that is not open
    /// is an error. Publishes an order-changed event with the closed order and an
    /// order-completed event carrying the identifiers.
    pub async fn complete_order(&self, order_id: i64) -> Result<CompletedOrderRepr, OrderFlowError> {
        let outcome = self.db.complete_order(order_id).await?;
        info!("🍽️ Order #{order_id} for customer [{}] completed and archived", outcome.completed.customer_id);
        self.call_order_changed_hook(&outcome.order).await;
        self.call_order_completed_hook(order_id, &outcome.completed.customer_id).await;
        Ok(outcome.completed)
    }

    async fn call_order_changed_hook(&self, order: &FullOrder) {
        for emitter in &self.producers.order_changed_producers {
            trace!("🍽️ Notifying order changed hook subscribers of order #{}", order.id);
            let event = OrderChangedEvent::new(order.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_item_changed_hook(&self, item: &OrderItemRepr) {
        for emitter in &self.producers.order_item_changed_producers {
            trace!("🍽️ Notifying item changed hook subscribers of item #{}", item.id);
            let event = OrderItemChangedEvent::new(item.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_order_completed_hook(&self, order_id: i64, customer_id: &str) {
        for emitter in &self.producers.order_completed_producers {
            trace!("🍽️ Notifying order completed hook subscribers of order #{order_id}");
            let event = OrderCompletedEvent::new(order_id, customer_id.to_string());
            emitter.publish_event(event).await;
        }
    }
}

fn validate_submission(submission: &OrderSubmission) -> Result<(), OrderFlowError> {
    if submission.customer_id.trim().is_empty() {
        return Err(OrderFlowError::ValidationError("customer_id must not be empty".to_string()));
    }
    if submission.items.is_empty() {
        return Err(OrderFlowError::ValidationError("a submission must contain at least one item".to_string()));
    }
    if let Some(line) = submission.items.iter().find(|l| l.quantity <= 0) {
        return Err(OrderFlowError::ValidationError(format!(
            "quantity for menu item {} must be positive",
            line.menu_item_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::validate_submission;
    use crate::db_types::OrderSubmission;

    #[test]
    fn empty_customer_token_is_rejected() {
        let submission = OrderSubmission::new("  ", "Alice", "4");
        let err = validate_submission(&submission).unwrap_err();
        assert!(err.to_string().contains("customer_id"));
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        let submission = OrderSubmission::new("tok-1", "Alice", "4").with_item(10, 0);
        let err = validate_submission(&submission).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
        let submission = OrderSubmission::new("tok-1", "Alice", "4").with_item(10, 2);
        assert!(validate_submission(&submission).is_ok());
    }
}
