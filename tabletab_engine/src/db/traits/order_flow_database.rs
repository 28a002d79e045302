use crate::{
    db_types::{ItemStatusUpdate, OrderSubmission},
    order_objects::{ArchiveOutcome, OrderItemRepr, SubmissionOutcome},
    tab_api::errors::OrderFlowError,
};

/// The mutating half of a TableTab storage backend.
///
/// Every method is a single atomic unit of work: either all of its writes are persisted, or
/// none are. Callers observe the committed post-state in the return value. Backends do not
/// publish events; that is [`crate::OrderFlowApi`]'s job, after the commit.
#[allow(async_fn_in_trait)]
pub trait OrderFlowDatabase: Clone {
    /// Merge a batch submission into the customer's open order, creating the customer
    /// and/or order as needed. In one transaction:
    /// * the customer row is fetched or created atomically (upsert, never
    ///   check-then-insert),
    /// * the open order's metadata is overwritten with the submitted values (or a new open
    ///   order is created with them),
    /// * each line request either merges into an existing *pending* item for the same menu
    ///   item (quantity is incremented) or becomes a new pending item. Confirmed and
    ///   rejected items are never merged into.
    ///
    /// Fails with [`OrderFlowError::MenuItemNotFound`] before any write if a line references
    /// an unknown menu item.
    async fn submit_order(&self, submission: OrderSubmission) -> Result<SubmissionOutcome, OrderFlowError>;

    /// Apply a kitchen decision to a single pending item. Confirmation stores the optional
    /// preparation time; any other transition clears it. Fails with
    /// [`OrderFlowError::ItemAlreadyDecided`] if the item is already terminal and
    /// [`OrderFlowError::OrderItemNotFound`] if it does not exist.
    async fn update_item_status(&self, item_id: i64, update: ItemStatusUpdate) -> Result<OrderItemRepr, OrderFlowError>;

    /// Archive an open order: snapshot the order and every current item by value into the
    /// completed-order tables and mark the live order completed, all in one transaction.
    /// The live rows are retained.
    async fn complete_order(&self, order_id: i64) -> Result<ArchiveOutcome, OrderFlowError>;
}
