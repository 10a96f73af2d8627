use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DentalFlow API",
        description = r#"
Management console API for a dental laboratory: restoration cases with an
auditable status history, invoicing with server-computed totals, materials
inventory with low-stock alerts, per-case messaging, appointments and
read-only reports.

## Authentication

All endpoints except `/auth/login`, `/auth/register`, `/` and `/health`
require a bearer token:

```
Authorization: Bearer <token>
```

What a role may do is exposed at `GET /api/v1/auth/capabilities`.

## Errors

Every error uses the same envelope:

```json
{"status": "error", "message": "...", "code": "NOT_FOUND"}
```
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Accounts, tokens and capabilities"),
        (name = "cases", description = "Lab cases and status history"),
        (name = "invoices", description = "Invoices and line items"),
        (name = "inventory", description = "Materials, categories and suppliers"),
        (name = "patients", description = "Patient records"),
        (name = "dentists", description = "Referring-dentist directory"),
        (name = "messages", description = "Per-case messaging"),
        (name = "appointments", description = "Fittings and consultations"),
        (name = "reports", description = "Read-only aggregations"),
        (name = "health", description = "Liveness and readiness")
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::me,
        crate::handlers::auth::capabilities,

        crate::handlers::cases::list_cases,
        crate::handlers::cases::list_cases_for_dentist,
        crate::handlers::cases::get_case,
        crate::handlers::cases::create_case,
        crate::handlers::cases::update_case,
        crate::handlers::cases::update_case_status,
        crate::handlers::cases::delete_case,

        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,
        crate::handlers::invoices::create_invoice,
        crate::handlers::invoices::update_invoice,
        crate::handlers::invoices::update_invoice_status,
        crate::handlers::invoices::delete_invoice,

        crate::handlers::inventory::list_items,
        crate::handlers::inventory::list_low_stock,
        crate::handlers::inventory::get_item,
        crate::handlers::inventory::create_item,
        crate::handlers::inventory::update_item,
        crate::handlers::inventory::restock,
        crate::handlers::inventory::delete_item,
        crate::handlers::inventory::list_categories,
        crate::handlers::inventory::create_category,
        crate::handlers::inventory::list_suppliers,
        crate::handlers::inventory::create_supplier,

        crate::handlers::patients::list_patients,
        crate::handlers::patients::list_patients_for_dentist,
        crate::handlers::patients::get_patient,
        crate::handlers::patients::create_patient,
        crate::handlers::patients::update_patient,
        crate::handlers::patients::delete_patient,

        crate::handlers::dentists::list_dentists,
        crate::handlers::dentists::get_dentist,
        crate::handlers::dentists::create_dentist,

        crate::handlers::messages::list_contacts,
        crate::handlers::messages::list_for_case,
        crate::handlers::messages::send_message,

        crate::handlers::appointments::list_appointments,
        crate::handlers::appointments::get_appointment,
        crate::handlers::appointments::list_for_dentist,
        crate::handlers::appointments::list_for_patient,
        crate::handlers::appointments::list_for_date,
        crate::handlers::appointments::create_appointment,
        crate::handlers::appointments::update_appointment,
        crate::handlers::appointments::delete_appointment,

        crate::handlers::reports::financial_report,
        crate::handlers::reports::case_report,
        crate::handlers::reports::dentist_report,

        crate::handlers::health::health,
    ),
    components(
        schemas(
            crate::ApiResponse<serde_json::Value>,
            crate::errors::ErrorResponse,

            crate::auth::Role,
            crate::auth::Capability,
            crate::auth::TokenResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthPayload,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::CapabilitiesResponse,

            crate::services::cases::CaseStatus,
            crate::services::cases::CasePriority,
            crate::services::cases::CreateCaseRequest,
            crate::services::cases::UpdateCaseRequest,
            crate::services::cases::UpdateCaseStatusRequest,
            crate::services::cases::CaseResponse,
            crate::services::cases::CaseListResponse,
            crate::services::cases::CaseStatusHistoryResponse,
            crate::handlers::cases::CaseDetailResponse,

            crate::services::invoices::InvoiceStatus,
            crate::services::invoices::InvoiceItemRequest,
            crate::services::invoices::CreateInvoiceRequest,
            crate::services::invoices::UpdateInvoiceRequest,
            crate::services::invoices::UpdateInvoiceStatusRequest,
            crate::services::invoices::InvoiceItemResponse,
            crate::services::invoices::InvoiceResponse,
            crate::services::invoices::InvoiceListResponse,

            crate::services::inventory::CreateInventoryItemRequest,
            crate::services::inventory::UpdateInventoryItemRequest,
            crate::services::inventory::RestockRequest,
            crate::services::inventory::CreateCategoryRequest,
            crate::services::inventory::CreateSupplierRequest,
            crate::services::inventory::InventoryItemResponse,
            crate::handlers::inventory::CategoryResponse,
            crate::handlers::inventory::SupplierResponse,

            crate::services::patients::CreatePatientRequest,
            crate::services::patients::UpdatePatientRequest,
            crate::services::patients::PatientResponse,

            crate::services::dentists::CreateDentistRequest,
            crate::services::dentists::DentistResponse,

            crate::services::messages::SendMessageRequest,
            crate::services::messages::MessageResponse,
            crate::services::messages::ContactResponse,

            crate::services::appointments::CreateAppointmentRequest,
            crate::services::appointments::UpdateAppointmentRequest,
            crate::services::appointments::AppointmentResponse,

            crate::services::reports::FinancialReport,
            crate::services::reports::CaseReport,
            crate::services::reports::DentistReport,
            crate::services::reports::StatusTotals,
            crate::services::reports::DentistRevenue,
            crate::services::reports::DentistActivity,

            crate::handlers::health::HealthResponse,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_generates() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string(&openapi).unwrap();
        assert!(json.contains("DentalFlow API"));
        assert!(json.contains("/api/v1/cases"));
        assert!(json.contains("/api/v1/reports/financial"));
    }
}
