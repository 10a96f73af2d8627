//! Integration tests for registration, login, logout and the
//! capability listing endpoint.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn register_returns_token_and_sanitized_user() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({
                "username": "drsmith",
                "email": "drsmith@example.com",
                "password": "correct-horse-battery",
                "first_name": "Jordan",
                "last_name": "Smith",
                "role": "dentist",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["token"]["token_type"], "Bearer");
    assert!(body["data"]["token"]["access_token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["username"], "drsmith");
    assert_eq!(body["data"]["user"]["role"], "dentist");
    // The password hash never leaves the server
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    app.register_user("drsmith", "dentist").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({
                "username": "drsmith",
                "email": "other@example.com",
                "password": "correct-horse-battery",
                "first_name": "Jordan",
                "last_name": "Smith",
                "role": "dentist",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 409);

    let body = response_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "AUTH_USER_EXISTS");
}

#[tokio::test]
async fn register_rejects_unknown_role() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/register",
            Some(json!({
                "username": "drsmith",
                "email": "drsmith@example.com",
                "password": "correct-horse-battery",
                "first_name": "Jordan",
                "last_name": "Smith",
                "role": "superuser",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn login_accepts_username_or_email() {
    let app = TestApp::new().await;
    app.register_user("drsmith", "dentist").await;

    for identifier in ["drsmith", "drsmith@example.com"] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/auth/login",
                Some(json!({
                    "username": identifier,
                    "password": "correct-horse-battery",
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "login with {} should work", identifier);

        let body = response_json(response).await;
        assert!(body["data"]["token"]["access_token"].as_str().is_some());
        assert_eq!(body["data"]["user"]["username"], "drsmith");
    }
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new().await;
    app.register_user("drsmith", "dentist").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({
                "username": "drsmith",
                "password": "not-the-password",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), 401);

    let body = response_json(response).await;
    assert_eq!(body["code"], "AUTH_INVALID_CREDENTIALS");
}

#[tokio::test]
async fn me_returns_current_account() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["username"], "techie");
    assert_eq!(body["data"]["role"], "technician");
}

#[tokio::test]
async fn logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.register_user("drsmith", "dentist").await;

    let response = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status(), 200);

    // The revoked token no longer grants access
    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), 401);
    let body = response_json(response).await;
    assert_eq!(body["code"], "AUTH_REVOKED_TOKEN");
}

#[tokio::test]
async fn logout_is_idempotent() {
    let app = TestApp::new().await;
    let token = app.register_user("drsmith", "dentist").await;

    let first = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&token))
        .await;
    assert_eq!(first.status(), 200);

    // A second logout with the same (now revoked) token still succeeds
    let second = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&token))
        .await;
    assert_eq!(second.status(), 200);
}

#[tokio::test]
async fn capabilities_reflect_role() {
    let app = TestApp::new().await;
    let token = app.register_user("techie", "technician").await;

    let response = app
        .request(Method::GET, "/api/v1/auth/capabilities", None, Some(&token))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"]["role"], "technician");
    let capabilities: Vec<&str> = body["data"]["capabilities"]
        .as_array()
        .expect("capabilities array")
        .iter()
        .filter_map(|value| value.as_str())
        .collect();
    assert!(capabilities.contains(&"cases:update-status"));
    assert!(capabilities.contains(&"inventory:manage"));
    assert!(!capabilities.contains(&"invoices:read"));
    assert!(!capabilities.contains(&"reports:read"));
}
