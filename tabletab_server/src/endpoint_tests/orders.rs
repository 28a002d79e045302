use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use tabletab_engine::{
    db_types::{ItemStatusType, MenuItem, OrderStatusType},
    events::EventProducers,
    order_objects::{FullOrder, OrderItemRepr, SubmissionOutcome},
    OrderFlowApi,
    OrderFlowError,
    OrderQueryApi,
};
use ttb_common::Money;

use super::helpers::{get_request, patch_request, post_request};
use crate::{
    endpoint_tests::mocks::{MockOrderFlow, MockOrderQuery},
    routes::{OrderByIdRoute, OrdersRoute, SubmitOrderRoute, UpdateItemStatusRoute},
};

fn sample_order() -> FullOrder {
    FullOrder {
        id: 7,
        name: "Alice".to_string(),
        table_number: "4".to_string(),
        mobile_number: None,
        items: vec![OrderItemRepr {
            id: 11,
            menu_item: MenuItem {
                id: 3,
                name: "Pad Thai".to_string(),
                price: Money::from_cents(1250),
                image_url: None,
                is_available: true,
            },
            quantity: 2,
            status: ItemStatusType::Pending,
            preparation_time: None,
            order: 7,
        }],
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        customer_id: "tok-abc".to_string(),
        status: OrderStatusType::Open,
    }
}

const ORDER_JSON: &str = r#"{"id":7,"name":"Alice","table_number":"4","mobile_number":null,"items":[{"id":11,"menu_item":{"id":3,"name":"Pad Thai","price":"12.50","image_url":null,"is_available":true},"quantity":2,"status":"pending","preparation_time":null,"order":7}],"created_at":"2024-02-29T13:30:00Z","customer_id":"tok-abc","status":"open"}"#;

fn configure_flow(cfg: &mut ServiceConfig) {
    let mut backend = MockOrderFlow::new();
    backend.expect_submit_order().returning(|submission| {
        assert_eq!(submission.customer_id, "tok-abc");
        Ok(SubmissionOutcome { order: sample_order(), touched_item_ids: vec![11] })
    });
    backend.expect_update_item_status().returning(|id, update| match id {
        11 => {
            let mut item = sample_order().items.remove(0);
            item.status = update.status;
            item.preparation_time = update.preparation_time;
            Ok(item)
        },
        42 => Err(OrderFlowError::ItemAlreadyDecided(42, ItemStatusType::Rejected)),
        _ => Err(OrderFlowError::OrderItemNotFound(id)),
    });
    let api = OrderFlowApi::new(backend, EventProducers::default());
    cfg.service(SubmitOrderRoute::<MockOrderFlow>::new())
        .service(UpdateItemStatusRoute::<MockOrderFlow>::new())
        .app_data(web::Data::new(api));
}

fn configure_queries(cfg: &mut ServiceConfig) {
    let mut backend = MockOrderQuery::new();
    backend.expect_search_orders().returning(|filter| {
        // The handler defaults to open orders when no status is given.
        assert_eq!(filter.status, Some(OrderStatusType::Open));
        Ok(vec![sample_order()])
    });
    backend.expect_fetch_order().returning(|id| Ok((id == 7).then(sample_order)));
    let api = OrderQueryApi::new(backend);
    cfg.service(OrdersRoute::<MockOrderQuery>::new())
        .service(OrderByIdRoute::<MockOrderQuery>::new())
        .app_data(web::Data::new(api));
}

#[actix_web::test]
async fn submit_order_returns_the_full_order() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({
        "customer_id_write": "tok-abc",
        "name": "Alice",
        "table_number": "4",
        "items": [{"menu_item_id": 3, "quantity": 2}]
    });
    let (status, body) = post_request("/orders", payload, configure_flow).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, ORDER_JSON);
}

#[actix_web::test]
async fn submissions_with_zero_quantities_are_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({
        "customer_id_write": "tok-abc",
        "name": "Alice",
        "table_number": "4",
        "items": [{"menu_item_id": 3, "quantity": 0}]
    });
    let (status, body) = post_request("/orders", payload, configure_flow).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("must be positive"));
}

#[actix_web::test]
async fn confirm_item_returns_success_envelope() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"status": "confirmed", "preparation_time": 15});
    let (status, body) = patch_request("/order-items/11/status", payload, configure_flow).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Item #11 is now confirmed"}"#);
}

#[actix_web::test]
async fn unknown_item_status_is_a_validation_error() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"status": "eaten"});
    let (status, body) = patch_request("/order-items/11/status", payload, configure_flow).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request body: Invalid status: eaten"}"#);
}

#[actix_web::test]
async fn decided_items_cannot_be_redecided() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"status": "confirmed"});
    let (status, body) = patch_request("/order-items/42/status", payload, configure_flow).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("already rejected"));
}

#[actix_web::test]
async fn missing_items_are_404() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"status": "rejected"});
    let (status, body) = patch_request("/order-items/999/status", payload, configure_flow).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Order item 999 does not exist"));
}

#[actix_web::test]
async fn list_orders_defaults_to_open() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders", configure_queries).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!("[{ORDER_JSON}]"));
}

#[actix_web::test]
async fn invalid_status_filter_is_400() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders?status=paid", configure_queries).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid status: paid"));
}

#[actix_web::test]
async fn fetch_order_by_id() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders/7", configure_queries).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDER_JSON);

    let (status, body) = get_request("/orders/8", configure_queries).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order #8"}"#);
}
