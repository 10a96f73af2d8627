//! Invoicing: totals are computed server-side from line items, paying
//! stamps the payment date and is terminal, and overdue status is
//! derived from the due date.

mod common;

use std::str::FromStr;

use axum::http::Method;
use chrono::{Duration, Utc};
use common::{response_json, TestApp};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

/// Money fields serialize as strings; compare them numerically so the
/// stored scale does not matter.
fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("money field is a string")).expect("parse money field")
}

fn invoice_payload(dentist_id: &str, patient_id: &str, due_in_days: i64) -> Value {
    let due_date = (Utc::now() + Duration::days(due_in_days))
        .date_naive()
        .to_string();
    json!({
        "patient_id": patient_id,
        "dentist_id": dentist_id,
        "due_date": due_date,
        "items": [
            {"description": "Zirconia crown", "quantity": 1, "unit_price": "950.00"},
            {"description": "Custom shade match", "quantity": 1, "unit_price": "200.00"},
            {"description": "Rush fee", "quantity": 1, "unit_price": "200.00"},
        ],
    })
}

#[tokio::test]
async fn totals_are_computed_from_items() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, 30)),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    let invoice = &body["data"];
    // 950 + 200 + 200 = 1350, taxed at the default 8%
    assert_eq!(money(&invoice["amount"]), dec!(1350));
    assert_eq!(money(&invoice["tax"]), dec!(108));
    assert_eq!(money(&invoice["total"]), dec!(1458));
    assert_eq!(invoice["status"], "unpaid");
    assert!(invoice["paid_date"].is_null());
    assert!(
        invoice["invoice_number"]
            .as_str()
            .expect("invoice number")
            .starts_with("INV-"),
    );
    assert_eq!(invoice["items"].as_array().expect("items").len(), 3);
}

#[tokio::test]
async fn empty_item_list_is_rejected() {
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
                "items": [],
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn removing_the_last_item_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, 30)),
            Some(&admin),
        )
        .await;
    let invoice_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("invoice id")
        .to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{}", invoice_id),
            Some(json!({"items": []})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);

    // The stored items and totals are untouched by the rejected update
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/invoices/{}", invoice_id),
            None,
            Some(&admin),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["items"].as_array().expect("items").len(), 3);
    assert_eq!(money(&body["data"]["amount"]), dec!(1350));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_numbers() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let first = app.request(
        Method::POST,
        "/api/v1/invoices",
        Some(invoice_payload(&dentist_id, &patient_id, 30)),
        Some(&admin),
    );
    let second = app.request(
        Method::POST,
        "/api/v1/invoices",
        Some(invoice_payload(&dentist_id, &patient_id, 30)),
        Some(&admin),
    );
    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.status(), 201);
    assert_eq!(second.status(), 201);

    let first = response_json(first).await;
    let second = response_json(second).await;
    assert_ne!(
        first["data"]["invoice_number"], second["data"]["invoice_number"],
        "simultaneous creates must not share an invoice number"
    );
}

#[tokio::test]
async fn paying_stamps_paid_date_and_is_terminal() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, 30)),
            Some(&admin),
        )
        .await;
    let invoice_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("invoice id")
        .to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{}/status", invoice_id),
            Some(json!({"status": "paid"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "paid");
    assert!(body["data"]["paid_date"].as_str().is_some());

    // Once paid, the invoice cannot be reopened
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{}/status", invoice_id),
            Some(json!({"status": "unpaid"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body = response_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn overdue_is_derived_from_due_date() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    // One invoice already past due, one comfortably in the future
    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, -10)),
            Some(&admin),
        )
        .await;
    let overdue_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("invoice id")
        .to_string();

    app.request(
        Method::POST,
        "/api/v1/invoices",
        Some(invoice_payload(&dentist_id, &patient_id, 30)),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/invoices?status=overdue",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let invoices = body["data"]["invoices"].as_array().expect("invoices array");
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["id"], overdue_id.as_str());
    assert_eq!(invoices[0]["status"], "overdue");
}

#[tokio::test]
async fn paid_overdue_invoice_is_not_overdue() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, -10)),
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
            &format!("/api/v1/invoices/{}", invoice_id),
            None,
            Some(&admin),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "paid");
}

#[tokio::test]
async fn updating_items_recomputes_totals() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(&admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(&dentist_id, &patient_id, 30)),
            Some(&admin),
        )
        .await;
    let invoice_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("invoice id")
        .to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/invoices/{}", invoice_id),
            Some(json!({
                "items": [
                    {"description": "Zirconia crown", "quantity": 2, "unit_price": "500.00"},
                ],
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(money(&body["data"]["amount"]), dec!(1000));
    assert_eq!(body["data"]["items"].as_array().expect("items").len(), 1);
}
