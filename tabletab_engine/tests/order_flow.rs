//! End-to-end tests for the order aggregation, kitchen decision and archival flows, run
//! against a real SQLite database.
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tabletab_engine::{
    db_types::{ItemStatusType, ItemStatusUpdate, MenuItemUpdate, NewMenuItem, OrderSubmission, OrderStatusType},
    events::{EventHandlers, EventHooks, EventProducers},
    order_objects::OrderQueryFilter,
    test_utils::{prepare_test_env, random_db_path},
    MenuApi,
    OrderFlowApi,
    OrderFlowError,
    OrderQueryApi,
    SqliteDatabase,
};
use ttb_common::Money;

async fn new_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

fn menu_item(name: &str, cents: i64) -> NewMenuItem {
    NewMenuItem { name: name.to_string(), price: Money::from(cents), image_url: None, is_available: true }
}

#[tokio::test]
async fn submissions_merge_into_the_open_order() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let burger = menu.create_menu_item(menu_item("Burger", 1250)).await.unwrap();
    let fries = menu.create_menu_item(menu_item("Fries", 450)).await.unwrap();

    let order = api
        .submit_order(OrderSubmission::new("c1", "Alice", "4").with_item(burger.id, 2))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatusType::Open);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);

    // Same menu item again, plus a new one. The burger line merges, fries is a new line,
    // and the metadata takes the latest submission's values.
    let mut resubmission = OrderSubmission::new("c1", "Alicia", "6").with_item(burger.id, 1).with_item(fries.id, 3);
    resubmission.mobile_number = Some("555-0101".to_string());
    let updated = api.submit_order(resubmission).await.unwrap();
    assert_eq!(updated.id, order.id, "the open order is reused, not duplicated");
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.table_number, "6");
    assert_eq!(updated.mobile_number.as_deref(), Some("555-0101"));
    assert_eq!(updated.items.len(), 2);
    let burger_line = updated.items.iter().find(|i| i.menu_item.id == burger.id).unwrap();
    assert_eq!(burger_line.quantity, 3, "2 + 1 merged into the pending line");
    assert_eq!(burger_line.status, ItemStatusType::Pending);
    let fries_line = updated.items.iter().find(|i| i.menu_item.id == fries.id).unwrap();
    assert_eq!(fries_line.quantity, 3);
}

#[tokio::test]
async fn decided_items_never_merge() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let soup = menu.create_menu_item(menu_item("Soup", 600)).await.unwrap();

    let order = api.submit_order(OrderSubmission::new("c2", "Bob", "1").with_item(soup.id, 1)).await.unwrap();
    let item_id = order.items[0].id;
    api.update_item_status(item_id, ItemStatusUpdate::confirmed(Some(10))).await.unwrap();

    let updated = api.submit_order(OrderSubmission::new("c2", "Bob", "1").with_item(soup.id, 2)).await.unwrap();
    assert_eq!(updated.items.len(), 2, "a confirmed item gets a fresh pending line alongside it");
    let confirmed = updated.item(item_id).unwrap();
    assert_eq!(confirmed.status, ItemStatusType::Confirmed);
    assert_eq!(confirmed.quantity, 1, "the decided quantity is untouched");
    let fresh = updated.items.iter().find(|i| i.id != item_id).unwrap();
    assert_eq!(fresh.status, ItemStatusType::Pending);
    assert_eq!(fresh.quantity, 2);
}

#[tokio::test]
async fn preparation_time_only_sticks_to_confirmations() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let cake = menu.create_menu_item(menu_item("Cake", 700)).await.unwrap();

    let order = api
        .submit_order(OrderSubmission::new("c3", "Cleo", "2").with_item(cake.id, 1).with_item(cake.id, 1))
        .await
        .unwrap();
    // Both lines referenced the same menu item, so they merged into one.
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    let item_id = order.items[0].id;

    let item = api.update_item_status(item_id, ItemStatusUpdate::confirmed(Some(25))).await.unwrap();
    assert_eq!(item.status, ItemStatusType::Confirmed);
    assert_eq!(item.preparation_time, Some(25));

    // Rejections discard any preparation time the caller supplied.
    let order2 = api.submit_order(OrderSubmission::new("c4", "Drew", "3").with_item(cake.id, 1)).await.unwrap();
    let update = ItemStatusUpdate { status: ItemStatusType::Rejected, preparation_time: Some(99) };
    let rejected = api.update_item_status(order2.items[0].id, update).await.unwrap();
    assert_eq!(rejected.status, ItemStatusType::Rejected);
    assert_eq!(rejected.preparation_time, None);
}

#[tokio::test]
async fn decisions_are_final() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let tea = menu.create_menu_item(menu_item("Tea", 300)).await.unwrap();

    let order = api.submit_order(OrderSubmission::new("c5", "Eve", "7").with_item(tea.id, 1)).await.unwrap();
    let item_id = order.items[0].id;

    // Moving an item back to pending is not a thing.
    let update = ItemStatusUpdate { status: ItemStatusType::Pending, preparation_time: None };
    let err = api.update_item_status(item_id, update).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::ValidationError(_)));

    api.update_item_status(item_id, ItemStatusUpdate::rejected()).await.unwrap();
    let err = api.update_item_status(item_id, ItemStatusUpdate::confirmed(None)).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::ItemAlreadyDecided(id, ItemStatusType::Rejected) if id == item_id));

    let err = api.update_item_status(9999, ItemStatusUpdate::rejected()).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::OrderItemNotFound(9999)));
}

#[tokio::test]
async fn unknown_menu_items_fail_the_whole_submission() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let query = OrderQueryApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let pie = menu.create_menu_item(menu_item("Pie", 550)).await.unwrap();

    let submission = OrderSubmission::new("c6", "Finn", "9").with_item(pie.id, 1).with_item(424242, 1);
    let err = api.submit_order(submission).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::MenuItemNotFound(424242)));

    // Nothing was written, not even the customer's open order.
    let orders = query.search_orders(OrderQueryFilter::default().with_customer_id("c6")).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn completion_snapshots_the_order() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let query = OrderQueryApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let pasta = menu.create_menu_item(menu_item("Pasta", 1100)).await.unwrap();

    let order = api.submit_order(OrderSubmission::new("c7", "Gus", "5").with_item(pasta.id, 2)).await.unwrap();
    api.update_item_status(order.items[0].id, ItemStatusUpdate::confirmed(Some(15))).await.unwrap();

    let completed = api.complete_order(order.id).await.unwrap();
    assert_eq!(completed.order_id, order.id);
    assert_eq!(completed.customer_id, "c7");
    assert_eq!(completed.items.len(), 1);
    assert_eq!(completed.items[0].menu_item_name, "Pasta");
    assert_eq!(completed.items[0].price, Money::from(1100));
    assert_eq!(completed.items[0].quantity, 2);
    assert_eq!(completed.items[0].status, ItemStatusType::Confirmed);

    // A later menu edit must not rewrite the archive.
    let update = MenuItemUpdate { price: Some(Money::from(9900)), ..Default::default() };
    menu.update_menu_item(pasta.id, update).await.unwrap();
    let archived = query.fetch_completed_order(order.id).await.unwrap().unwrap();
    assert_eq!(archived.items[0].price, Money::from(1100));
    assert_eq!(archived.items[0].menu_item_name, "Pasta");

    // The live order is closed, and completing it again is an error.
    let live = query.fetch_order(order.id).await.unwrap().unwrap();
    assert_eq!(live.status, OrderStatusType::Completed);
    let err = api.complete_order(order.id).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::OrderNotOpen(id) if id == order.id));
    let err = api.complete_order(31337).await.unwrap_err();
    assert!(matches!(err, OrderFlowError::OrderNotFound(31337)));

    // The customer can start a fresh order now.
    let next = api.submit_order(OrderSubmission::new("c7", "Gus", "5").with_item(pasta.id, 1)).await.unwrap();
    assert_ne!(next.id, order.id);
}

#[tokio::test]
async fn order_queries_filter_by_status_and_customer() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());
    let query = OrderQueryApi::new(db.clone());
    let api = OrderFlowApi::new(db, EventProducers::default());
    let taco = menu.create_menu_item(menu_item("Taco", 800)).await.unwrap();

    let o1 = api.submit_order(OrderSubmission::new("hank", "Hank", "1").with_item(taco.id, 1)).await.unwrap();
    let o2 = api.submit_order(OrderSubmission::new("iris", "Iris", "2").with_item(taco.id, 2)).await.unwrap();
    api.complete_order(o1.id).await.unwrap();

    let open = query.search_orders(OrderQueryFilter::default().with_status(OrderStatusType::Open)).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, o2.id);

    let hanks = query.search_orders(OrderQueryFilter::default().with_customer_id("hank")).await.unwrap();
    assert_eq!(hanks.len(), 1);
    assert_eq!(hanks[0].status, OrderStatusType::Completed);

    let all = query.search_orders(OrderQueryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let archive = query.fetch_completed_orders().await.unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive[0].order_id, o1.id);
    assert!(query.fetch_completed_order(o2.id).await.unwrap().is_none());
}

#[tokio::test]
async fn every_mutation_reaches_the_hooks() {
    let db = new_db().await;
    let menu = MenuApi::new(db.clone());

    let order_events = Arc::new(AtomicUsize::new(0));
    let item_events = Arc::new(AtomicUsize::new(0));
    let completed_events = Arc::new(AtomicUsize::new(0));
    let mut hooks = EventHooks::default();
    let counter = Arc::clone(&order_events);
    hooks.on_order_changed(move |_ev| {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    });
    let counter = Arc::clone(&item_events);
    hooks.on_order_item_changed(move |_ev| {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    });
    let counter = Arc::clone(&completed_events);
    hooks.on_order_completed(move |ev| {
        let counter = Arc::clone(&counter);
        Box::pin(async move {
            assert!(!ev.customer_id.is_empty());
            counter.fetch_add(1, Ordering::SeqCst);
        })
    });
    let handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let api = OrderFlowApi::new(db, producers);
    let nachos = menu.create_menu_item(menu_item("Nachos", 950)).await.unwrap();
    let salsa = menu.create_menu_item(menu_item("Salsa", 150)).await.unwrap();

    let order = api
        .submit_order(OrderSubmission::new("jay", "Jay", "8").with_item(nachos.id, 1).with_item(salsa.id, 2))
        .await
        .unwrap();
    api.update_item_status(order.items[0].id, ItemStatusUpdate::confirmed(Some(5))).await.unwrap();
    api.complete_order(order.id).await.unwrap();

    // Hook handlers run on their own tasks; give them a beat to drain.
    tokio::time::sleep(Duration::from_millis(250)).await;
    // submission + completion each publish an order-changed event
    assert_eq!(order_events.load(Ordering::SeqCst), 2);
    // two lines in the submission + one kitchen decision
    assert_eq!(item_events.load(Ordering::SeqCst), 3);
    assert_eq!(completed_events.load(Ordering::SeqCst), 1);
}
