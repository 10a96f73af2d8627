//! Case workflow: creation seeds the audit trail, every status change
//! appends exactly one entry, and the guard rails (same-status, empty
//! notes) hold.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

async fn create_case(app: &TestApp, token: &str, dentist_id: &str, patient_id: &str) -> String {
    let response = app
        .request(
            Method::POST,
            "/api/v1/cases",
            Some(json!({
                "title": "Zirconia crown, tooth 14",
                "description": "Shade A2, rush job",
                "priority": "high",
                "patient_id": patient_id,
                "dentist_id": dentist_id,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), 201);
    response_json(response).await["data"]["id"]
        .as_str()
        .expect("case id")
        .to_string()
}

#[tokio::test]
async fn creation_seeds_one_history_entry() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let case_id = create_case(&app, &admin, &dentist_id, &patient_id).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/cases/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let case = &body["data"]["case"];
    assert_eq!(case["status"], "new");
    assert!(
        case["case_number"]
            .as_str()
            .expect("case number")
            .starts_with("CASE-"),
        "case numbers carry the CASE- prefix"
    );

    let history = body["data"]["status_history"]
        .as_array()
        .expect("status history array");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["status"], "new");
    assert_eq!(history[0]["notes"], "Case created");
}

#[tokio::test]
async fn status_change_appends_exactly_one_entry() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;
    let case_id = create_case(&app, &admin, &dentist_id, &patient_id).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/cases/{}/status", case_id),
            Some(json!({"status": "in_progress", "notes": "Started milling"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "in_progress");

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/cases/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    let body = response_json(response).await;
    let history = body["data"]["status_history"]
        .as_array()
        .expect("status history array");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["status"], "new");
    assert_eq!(history[1]["status"], "in_progress");
    assert_eq!(history[1]["notes"], "Started milling");
}

#[tokio::test]
async fn status_change_requires_notes() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;
    let case_id = create_case(&app, &admin, &dentist_id, &patient_id).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/cases/{}/status", case_id),
            Some(json!({"status": "in_progress", "notes": ""})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);

    // The rejected change must not leave a history entry behind
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/cases/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(
        body["data"]["status_history"]
            .as_array()
            .expect("status history array")
            .len(),
        1
    );
    assert_eq!(body["data"]["case"]["status"], "new");
}

#[tokio::test]
async fn same_status_transition_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;
    let case_id = create_case(&app, &admin, &dentist_id, &patient_id).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/cases/{}/status", case_id),
            Some(json!({"status": "new", "notes": "No-op transition"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert_eq!(body["code"], "INVALID_OPERATION");
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let first = create_case(&app, &admin, &dentist_id, &patient_id).await;
    let _second = create_case(&app, &admin, &dentist_id, &patient_id).await;

    app.request(
        Method::PUT,
        &format!("/api/v1/cases/{}/status", first),
        Some(json!({"status": "completed", "notes": "Glazed and shipped"})),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/cases?status=completed",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let cases = body["data"]["cases"].as_array().expect("cases array");
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["id"], first.as_str());
    assert_eq!(cases[0]["status"], "completed");
}

#[tokio::test]
async fn unknown_status_filter_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/cases?status=misplaced",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn deleted_case_is_gone() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;
    let case_id = create_case(&app, &admin, &dentist_id, &patient_id).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/cases/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/cases/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 404);
}
