use actix_web::{http::StatusCode, web, web::ServiceConfig};
use tabletab_engine::{db_types::MenuItem, MenuApi};
use ttb_common::Money;

use super::helpers::{get_request, post_request};
use crate::{
    endpoint_tests::mocks::MockMenuManager,
    routes::{CreateMenuItemRoute, MenuItemRoute, MenuItemsRoute},
};

fn sample_menu() -> Vec<MenuItem> {
    vec![
        MenuItem {
            id: 1,
            name: "Pad Thai".to_string(),
            price: Money::from_cents(1250),
            image_url: None,
            is_available: true,
        },
        MenuItem {
            id: 2,
            name: "Green Curry".to_string(),
            price: Money::from_cents(1400),
            image_url: Some("https://cdn.example.com/curry.jpg".to_string()),
            is_available: false,
        },
    ]
}

fn configure(cfg: &mut ServiceConfig) {
    let mut backend = MockMenuManager::new();
    backend.expect_fetch_menu_items().returning(|| Ok(sample_menu()));
    backend.expect_fetch_menu_item().returning(|id| Ok(sample_menu().into_iter().find(|m| m.id == id)));
    backend.expect_insert_menu_item().returning(|item| {
        Ok(MenuItem { id: 3, name: item.name, price: item.price, image_url: item.image_url, is_available: item.is_available })
    });
    let api = MenuApi::new(backend);
    cfg.service(MenuItemsRoute::<MockMenuManager>::new())
        .service(CreateMenuItemRoute::<MockMenuManager>::new())
        .service(MenuItemRoute::<MockMenuManager>::new())
        .app_data(web::Data::new(api));
}

#[actix_web::test]
async fn list_menu_items() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/menu", configure).await;
    assert_eq!(status, StatusCode::OK);
    let expected = r#"[{"id":1,"name":"Pad Thai","price":"12.50","image_url":null,"is_available":true},{"id":2,"name":"Green Curry","price":"14.00","image_url":"https://cdn.example.com/curry.jpg","is_available":false}]"#;
    assert_eq!(body, expected);
}

#[actix_web::test]
async fn fetch_single_menu_item() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/menu/1", configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""name":"Pad Thai""#));
}

#[actix_web::test]
async fn unknown_menu_item_is_404() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/menu/99", configure).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Menu item #99"}"#);
}

#[actix_web::test]
async fn create_menu_item_returns_201() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"name": "Spring Rolls", "price": "6.50"});
    let (status, body) = post_request("/menu", payload, configure).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"id":3,"name":"Spring Rolls","price":"6.50","image_url":null,"is_available":true}"#);
}

#[actix_web::test]
async fn blank_names_are_rejected() {
    let _ = env_logger::try_init().ok();
    let payload = serde_json::json!({"name": "   ", "price": "6.50"});
    let (status, body) = post_request("/menu", payload, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("name must not be empty"));
}
