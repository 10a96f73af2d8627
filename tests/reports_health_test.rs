//! Report aggregations and the unauthenticated health endpoints.

mod common;

use axum::http::Method;
use chrono::{Duration, Utc};
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn root_and_health_are_public() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["status"], "running");

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert!(body["paths"]["/api/v1/cases"].is_object());
    assert!(body["paths"]["/api/v1/auth/login"].is_object());
}

#[tokio::test]
async fn financial_report_aggregates_invoices() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let due_date = (Utc::now() + Duration::days(30)).date_naive().to_string();
    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({
                "patient_id": patient_id,
                "dentist_id": dentist_id,
                "due_date": due_date,
                "items": [
                    {"description": "Zirconia crown", "quantity": 1, "unit_price": "950.00"},
                ],
            })),
            Some(&admin),
        )
        .await;
    let invoice_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("invoice id")
        .to_string();

    app.request(
        Method::PUT,
        &format!("/api/v1/invoices/{}/status", invoice_id),
        Some(json!({"status": "paid"})),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/reports/financial?months=6",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let report = &body["data"];
    assert_eq!(report["window_months"], 6);
    assert_eq!(report["by_status"]["paid"]["count"], 1);

    // This month's collected revenue covers the paid invoice
    let month_key = Utc::now().format("%Y-%m").to_string();
    assert!(report["monthly_revenue"][&month_key].as_str().is_some());

    let top = report["top_dentists"].as_array().expect("top dentists");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["dentist_name"], "Alice Morgan");
}

#[tokio::test]
async fn case_report_counts_by_status_and_priority() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    for priority in ["high", "high", "low"] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/cases",
                Some(json!({
                    "title": "Zirconia crown",
                    "priority": priority,
                    "patient_id": patient_id,
                    "dentist_id": dentist_id,
                })),
                Some(&admin),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .request(Method::GET, "/api/v1/reports/cases", None, Some(&admin))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let report = &body["data"];
    assert_eq!(report["by_status"]["new"], 3);
    assert_eq!(report["by_priority"]["high"], 2);
    assert_eq!(report["by_priority"]["low"], 1);
}

#[tokio::test]
async fn dentist_report_lists_activity() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    app.request(
        Method::POST,
        "/api/v1/cases",
        Some(json!({
            "title": "Zirconia crown",
            "priority": "medium",
            "patient_id": patient_id,
            "dentist_id": dentist_id,
        })),
        Some(&admin),
    )
    .await;

    let response = app
        .request(Method::GET, "/api/v1/reports/dentists", None, Some(&admin))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let dentists = body["data"]["dentists"].as_array().expect("dentists");
    assert_eq!(dentists.len(), 1);
    assert_eq!(dentists[0]["dentist_id"], dentist_id.as_str());
    assert_eq!(dentists[0]["case_count"], 1);
}
