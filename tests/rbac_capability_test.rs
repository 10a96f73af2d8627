//! Role-based access control through the HTTP surface: unauthenticated
//! requests are rejected, and each role can reach exactly the routes
//! its capabilities allow.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    for uri in [
        "/api/v1/cases",
        "/api/v1/invoices",
        "/api/v1/inventory",
        "/api/v1/patients",
        "/api/v1/reports/financial",
        "/api/v1/messages/contacts",
    ] {
        let response = app.request(Method::GET, uri, None, None).await;
        assert_eq!(response.status(), 401, "{} should require auth", uri);
    }
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/cases", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn technician_cannot_read_invoices() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(Method::GET, "/api/v1/invoices", None, Some(&token))
        .await;
    assert_eq!(response.status(), 403);

    let body = response_json(response).await;
    assert_eq!(body["code"], "AUTH_INSUFFICIENT_PERMISSIONS");
}

#[tokio::test]
async fn technician_cannot_create_cases() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/cases",
            Some(json!({
                "title": "Zirconia crown, tooth 14",
                "priority": "medium",
                "patient_id": patient_id,
                "dentist_id": dentist_id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn dentist_cannot_change_case_status() {
    let app = TestApp::new().await;
    let dentist_token = app.register_user("drsmith", "dentist").await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    // Dentists may open cases
    let response = app
        .request(
            Method::POST,
            "/api/v1/cases",
            Some(json!({
                "title": "Zirconia crown, tooth 14",
                "priority": "medium",
                "patient_id": patient_id,
                "dentist_id": dentist_id,
            })),
            Some(&dentist_token),
        )
        .await;
    assert_eq!(response.status(), 201);
    let case_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("case id")
        .to_string();

    // But the workflow status belongs to the lab
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/cases/{}/status", case_id),
            Some(json!({"status": "in_progress", "notes": "Started milling"})),
            Some(&dentist_token),
        )
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn dentist_cannot_touch_inventory() {
    let app = TestApp::new().await;
    let token = app.register_user("drsmith", "dentist").await;

    let response = app
        .request(Method::GET, "/api/v1/inventory", None, Some(&token))
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn reports_are_admin_only() {
    let app = TestApp::new().await;
    let technician = app.register_user("techie", "technician").await;
    let dentist = app.register_user("drsmith", "dentist").await;
    let admin = app.admin_token().await;

    for token in [&technician, &dentist] {
        let response = app
            .request(Method::GET, "/api/v1/reports/financial", None, Some(token))
            .await;
        assert_eq!(response.status(), 403);
    }

    let response = app
        .request(Method::GET, "/api/v1/reports/financial", None, Some(&admin))
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn dentist_creation_requires_admin() {
    let app = TestApp::new().await;
    let dentist_token = app.register_user("drsmith", "dentist").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/dentists",
            Some(json!({"first_name": "Alice", "last_name": "Morgan"})),
            Some(&dentist_token),
        )
        .await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn admin_can_reach_every_subtree() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    for uri in [
        "/api/v1/cases",
        "/api/v1/invoices",
        "/api/v1/inventory",
        "/api/v1/patients",
        "/api/v1/dentists",
        "/api/v1/appointments",
        "/api/v1/messages/contacts",
        "/api/v1/reports/cases",
        "/api/v1/reports/dentists",
    ] {
        let response = app.request(Method::GET, uri, None, Some(&admin)).await;
        assert_eq!(response.status(), 200, "{} should be reachable as admin", uri);
    }
}
