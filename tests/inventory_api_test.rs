//! Materials inventory: low-stock detection, restocking, and the
//! category/supplier reference lists.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::{json, Value};

async fn create_item(app: &TestApp, token: &str, name: &str, quantity: i32, reorder: i32) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "name": name,
                "quantity": quantity,
                "unit": "g",
                "reorder_level": reorder,
                "unit_price": "4.50",
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await["data"].clone()
}

#[tokio::test]
async fn low_stock_is_derived_from_reorder_level() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let low = create_item(&app, &token, "Zirconia blank", 2, 5).await;
    assert_eq!(low["low_stock"], true);

    let stocked = create_item(&app, &token, "Porcelain powder", 50, 5).await;
    assert_eq!(stocked["low_stock"], false);

    let response = app
        .request(Method::GET, "/api/v1/inventory/low-stock", None, Some(&token))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let items = body["data"].as_array().expect("low stock array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], low["id"]);
}

#[tokio::test]
async fn restock_adds_quantity_and_stamps_last_ordered() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;
    let item = create_item(&app, &token, "Zirconia blank", 2, 5).await;
    assert!(item["last_ordered"].is_null());

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory/restock",
            Some(json!({"item_id": item["id"], "quantity": 10})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity"], 12);
    assert_eq!(body["data"]["low_stock"], false);
    assert!(body["data"]["last_ordered"].as_str().is_some());
}

#[tokio::test]
async fn restock_rejects_non_positive_quantities() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;
    let item = create_item(&app, &token, "Zirconia blank", 2, 5).await;

    for quantity in [0, -4] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/inventory/restock",
                Some(json!({"item_id": item["id"], "quantity": quantity})),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), 400, "restock of {} should fail", quantity);
    }
}

#[tokio::test]
async fn restock_rejects_quantity_overflow() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;
    let item = create_item(&app, &token, "Zirconia blank", i32::MAX, 5).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory/restock",
            Some(json!({"item_id": item["id"], "quantity": 1})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 400);

    // The failed restock leaves the item untouched
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/inventory/{}", item["id"].as_str().expect("id")),
            None,
            Some(&token),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["quantity"], i32::MAX);
    assert!(body["data"]["last_ordered"].is_null());
}

#[tokio::test]
async fn negative_stock_is_rejected() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory",
            Some(json!({
                "name": "Zirconia blank",
                "quantity": -1,
                "unit": "g",
                "reorder_level": 5,
                "unit_price": "4.50",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 400);

    let item = create_item(&app, &token, "Zirconia blank", 3, 5).await;
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/inventory/{}", item["id"].as_str().expect("id")),
            Some(json!({"quantity": -2})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn duplicate_category_name_conflicts() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory/categories",
            Some(json!({"name": "Ceramics"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory/categories",
            Some(json!({"name": "Ceramics"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body = response_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn suppliers_round_trip() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/inventory/suppliers",
            Some(json!({
                "name": "Dental Materials Co",
                "contact_person": "Sam Lee",
                "email": "orders@dentalmaterials.example",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(Method::GET, "/api/v1/inventory/suppliers", None, Some(&token))
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let suppliers = body["data"].as_array().expect("suppliers array");
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0]["name"], "Dental Materials Co");
}

#[tokio::test]
async fn deleted_item_is_gone() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;
    let item = create_item(&app, &token, "Zirconia blank", 2, 5).await;
    let id = item["id"].as_str().expect("id");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/inventory/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/inventory/{}", id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 404);
}
