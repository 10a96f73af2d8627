//! # DentalFlow API
//!
//! Backend for a dental laboratory management console: restoration cases
//! with an auditable status history, invoicing with server-computed
//! totals, materials inventory, per-case messaging, appointments and
//! read-only reports.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod rate_limiter;
pub mod services;

use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use crate::auth::{AuthConfig, AuthService, Capability, CapabilityRouterExt};
use crate::db::DbPool;
use crate::events::EventSender;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub event_sender: Option<Arc<EventSender>>,
    pub auth_service: Arc<AuthService>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DbPool>,
        config: config::AppConfig,
        event_sender: Option<Arc<EventSender>>,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            AuthConfig::new(
                config.jwt_secret.clone(),
                Duration::from_secs(config.jwt_expiration as u64),
            ),
            db.clone(),
        ));
        // from_f64 rounds away binary-float noise (0.08 stays 0.08);
        // falls back to the documented default on a non-finite value
        let tax_rate =
            Decimal::from_f64(config.default_tax_rate).unwrap_or_else(|| Decimal::new(8, 2));
        let services = handlers::AppServices::new(db.clone(), event_sender.clone(), tax_rate);

        Self {
            db,
            config,
            event_sender,
            auth_service,
            services,
        }
    }
}

/// Success envelope: `{"status":"success","data":...}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always the literal `"success"`
    pub status: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All `/api/v1` routes. Public auth routes carry no middleware; every
/// other route requires a bearer token, and the messaging and reporting
/// subtrees are additionally capability-gated at the router level. The
/// remaining per-method capability checks live in the handlers.
fn api_v1_routes() -> Router<AppState> {
    let public_auth = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let session = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/capabilities", get(handlers::auth::capabilities))
        .with_auth();

    let resources = Router::new()
        .route(
            "/cases",
            get(handlers::cases::list_cases).post(handlers::cases::create_case),
        )
        .route(
            "/cases/dentist/:dentist_id",
            get(handlers::cases::list_cases_for_dentist),
        )
        .route(
            "/cases/:id",
            get(handlers::cases::get_case)
                .put(handlers::cases::update_case)
                .delete(handlers::cases::delete_case),
        )
        .route("/cases/:id/status", put(handlers::cases::update_case_status))
        .route(
            "/invoices",
            get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
        )
        .route(
            "/invoices/:id",
            get(handlers::invoices::get_invoice)
                .put(handlers::invoices::update_invoice)
                .delete(handlers::invoices::delete_invoice),
        )
        .route(
            "/invoices/:id/status",
            put(handlers::invoices::update_invoice_status),
        )
        .route(
            "/inventory",
            get(handlers::inventory::list_items).post(handlers::inventory::create_item),
        )
        .route("/inventory/low-stock", get(handlers::inventory::list_low_stock))
        .route("/inventory/restock", post(handlers::inventory::restock))
        .route(
            "/inventory/categories",
            get(handlers::inventory::list_categories).post(handlers::inventory::create_category),
        )
        .route(
            "/inventory/suppliers",
            get(handlers::inventory::list_suppliers).post(handlers::inventory::create_supplier),
        )
        .route(
            "/inventory/:id",
            get(handlers::inventory::get_item)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        .route(
            "/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/patients/dentist/:dentist_id",
            get(handlers::patients::list_patients_for_dentist),
        )
        .route(
            "/patients/:id",
            get(handlers::patients::get_patient)
                .put(handlers::patients::update_patient)
                .delete(handlers::patients::delete_patient),
        )
        .route(
            "/dentists",
            get(handlers::dentists::list_dentists).post(handlers::dentists::create_dentist),
        )
        .route("/dentists/:id", get(handlers::dentists::get_dentist))
        .route(
            "/appointments",
            get(handlers::appointments::list_appointments)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/appointments/dentist/:dentist_id",
            get(handlers::appointments::list_for_dentist),
        )
        .route(
            "/appointments/patient/:patient_id",
            get(handlers::appointments::list_for_patient),
        )
        .route(
            "/appointments/date/:date",
            get(handlers::appointments::list_for_date),
        )
        .route(
            "/appointments/:id",
            get(handlers::appointments::get_appointment)
                .put(handlers::appointments::update_appointment)
                .delete(handlers::appointments::delete_appointment),
        )
        .with_auth();

    let messages = Router::new()
        .route("/messages", post(handlers::messages::send_message))
        .route("/messages/contacts", get(handlers::messages::list_contacts))
        .route(
            "/messages/case/:case_id",
            get(handlers::messages::list_for_case),
        )
        .with_capability(Capability::MessagesUse);

    let reports = Router::new()
        .route(
            "/reports/financial",
            get(handlers::reports::financial_report),
        )
        .route("/reports/cases", get(handlers::reports::case_report))
        .route("/reports/dentists", get(handlers::reports::dentist_report))
        .with_capability(Capability::ReportsRead);

    Router::new()
        .merge(public_auth)
        .merge(session)
        .merge(resources)
        .merge(messages)
        .merge(reports)
}

/// Builds the full application router, including the liveness and health
/// endpoints, swagger UI and the auth service extension the middleware
/// relies on.
pub fn app_router(state: AppState) -> Router {
    let auth_service = state.auth_service.clone();

    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(Extension(auth_service))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let response = ApiResponse::success(42);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 42);
    }
}
