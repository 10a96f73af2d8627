//! Per-case messaging threads and the appointment schedule.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

async fn seed_case(app: &TestApp, admin: &str) -> (String, String, String) {
    let (dentist_id, patient_id) = app.seed_dentist_and_patient(admin).await;
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
            Some(admin),
        )
        .await;
    assert_eq!(response.status(), 201);
    let case_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("case id")
        .to_string();
    (case_id, dentist_id, patient_id)
}

#[tokio::test]
async fn messages_thread_in_send_order() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let technician = app.register_user("techie", "technician").await;
    let (case_id, _, _) = seed_case(&app, &admin).await;

    // The technician needs the admin's user id to address the reply
    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&admin))
        .await;
    let admin_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("admin id")
        .to_string();
    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&technician))
        .await;
    let technician_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("technician id")
        .to_string();

    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "case_id": case_id,
                "recipient_id": technician_id,
                "content": "Please prioritise this crown",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["data"]["sender_id"], admin_id.as_str());
    assert_eq!(body["data"]["read"], false);

    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "case_id": case_id,
                "recipient_id": admin_id,
                "content": "On it, milling starts today",
            })),
            Some(&technician),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/messages/case/{}", case_id),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let thread = body["data"].as_array().expect("message thread");
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0]["content"], "Please prioritise this crown");
    assert_eq!(thread[1]["content"], "On it, milling starts today");
}

#[tokio::test]
async fn contacts_exclude_the_caller() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.register_user("techie", "technician").await;
    app.register_user("drsmith", "dentist").await;

    let response = app
        .request(Method::GET, "/api/v1/messages/contacts", None, Some(&admin))
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let usernames: Vec<&str> = body["data"]
        .as_array()
        .expect("contacts array")
        .iter()
        .filter_map(|contact| contact["username"].as_str())
        .collect();
    assert_eq!(usernames, vec!["drsmith", "techie"]);
}

#[tokio::test]
async fn message_to_unknown_case_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&admin))
        .await;
    let admin_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("admin id")
        .to_string();

    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(json!({
                "case_id": "00000000-0000-0000-0000-000000000000",
                "recipient_id": admin_id,
                "content": "Hello?",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn appointments_schedule_and_day_filter() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (case_id, dentist_id, patient_id) = seed_case(&app, &admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/appointments",
            Some(json!({
                "patient_id": patient_id,
                "dentist_id": dentist_id,
                "case_id": case_id,
                "appointment_date": "2026-09-14",
                "appointment_time": "09:30",
                "appointment_type": "fitting",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "scheduled");

    app.request(
        Method::POST,
        "/api/v1/appointments",
        Some(json!({
            "patient_id": patient_id,
            "dentist_id": dentist_id,
            "appointment_date": "2026-09-15",
            "appointment_time": "11:00",
            "appointment_type": "consultation",
        })),
        Some(&admin),
    )
    .await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/appointments/date/2026-09-14",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let day = body["data"].as_array().expect("appointments array");
    assert_eq!(day.len(), 1);
    assert_eq!(day[0]["appointment_type"], "fitting");
}

#[tokio::test]
async fn unparseable_date_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/appointments/date/next-tuesday",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn appointment_status_is_validated() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (case_id, dentist_id, patient_id) = seed_case(&app, &admin).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/appointments",
            Some(json!({
                "patient_id": patient_id,
                "dentist_id": dentist_id,
                "case_id": case_id,
                "appointment_date": "2026-09-14",
                "appointment_time": "09:30",
                "appointment_type": "fitting",
            })),
            Some(&admin),
        )
        .await;
    let appointment_id = response_json(response).await["data"]["id"]
        .as_str()
        .expect("appointment id")
        .to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/appointments/{}", appointment_id),
            Some(json!({"status": "no-show"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/appointments/{}", appointment_id),
            Some(json!({"status": "cancelled"})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "cancelled");
}
