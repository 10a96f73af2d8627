//! Shared test harness. Spins up the full router against a throwaway
//! SQLite database and exposes helpers for making (optionally
//! authenticated) requests through the real middleware stack.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use dentalflow_api::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    AppState,
};

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Dropping this removes the database file
    _db_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("dentalflow_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "integration-test-secret-key-0123456789abcdef".to_string(),
            3600,
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        cfg.auto_migrate = true;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");
        let db = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(db, cfg, Some(event_sender));
        let router = dentalflow_api::app_router(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a request through the router. `token` adds a bearer header.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = if let Some(json_body) = body {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json_body.to_string()))
                .expect("build request")
        } else {
            builder.body(Body::empty()).expect("build request")
        };

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router response")
    }

    /// Register an account with the given role and return its bearer
    /// token. Usernames must be unique within one TestApp.
    pub async fn register_user(&self, username: &str, role: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "correct-horse-battery",
                    "first_name": "Test",
                    "last_name": "User",
                    "role": role,
                })),
                None,
            )
            .await;
        assert_eq!(response.status(), 201, "registration should succeed");

        let body = response_json(response).await;
        body["data"]["token"]["access_token"]
            .as_str()
            .expect("access token in registration response")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.register_user("admin_fixture", "admin").await
    }

    /// Seed a dentist and a patient through the API and return their
    /// ids. Needs an admin token (dentist creation is admin-only).
    pub async fn seed_dentist_and_patient(&self, admin_token: &str) -> (String, String) {
        let response = self
            .request(
                Method::POST,
                "/api/v1/dentists",
                Some(json!({
                    "first_name": "Alice",
                    "last_name": "Morgan",
                    "email": "alice.morgan@smileclinic.example",
                    "clinic_name": "Smile Clinic",
                })),
                Some(admin_token),
            )
            .await;
        assert_eq!(response.status(), 201, "dentist seeding should succeed");
        let dentist = response_json(response).await;
        let dentist_id = dentist["data"]["id"].as_str().expect("dentist id").to_string();

        let response = self
            .request(
                Method::POST,
                "/api/v1/patients",
                Some(json!({
                    "first_name": "Bob",
                    "last_name": "Rivera",
                    "email": "bob.rivera@example.com",
                    "dentist_id": dentist_id,
                })),
                Some(admin_token),
            )
            .await;
        assert_eq!(response.status(), 201, "patient seeding should succeed");
        let patient = response_json(response).await;
        let patient_id = patient["data"]["id"].as_str().expect("patient id").to_string();

        (dentist_id, patient_id)
    }
}

/// Collect a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response body")
}
