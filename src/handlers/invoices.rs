use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    errors::ServiceError,
    services::invoices::{
        parse_invoice_status, CreateInvoiceRequest, InvoiceListResponse, InvoiceResponse,
        UpdateInvoiceRequest, UpdateInvoiceStatusRequest,
    },
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub struct InvoiceListQuery {
    pub status: Option<String>,
}

/// List invoices, optionally filtered by effective status
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(
        ("status" = Option<String>, Query, description = "Filter by effective status (unpaid, overdue, paid)"),
    ),
    responses(
        (status = 200, description = "Invoices retrieved", body = ApiResponse<InvoiceListResponse>),
        (status = 400, description = "Unknown status value", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<InvoiceListQuery>,
) -> Result<Json<ApiResponse<InvoiceListResponse>>, ServiceError> {
    auth_user.require(Capability::InvoicesRead)?;
    let status = query
        .status
        .as_deref()
        .map(parse_invoice_status)
        .transpose()?;
    let invoices = state.services.invoices.list_invoices(status).await?;
    Ok(Json(ApiResponse::success(invoices)))
}

/// Fetch one invoice with its line items
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice retrieved", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<InvoiceResponse>>, ServiceError> {
    auth_user.require(Capability::InvoicesRead)?;
    let invoice = state.services.invoices.get_invoice(id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Issue an invoice; totals are computed server-side
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice issued", body = ApiResponse<InvoiceResponse>),
        (status = 400, description = "Invalid payload or empty item list", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::InvoicesManage)?;
    let invoice = state.services.invoices.create_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))))
}

/// Update invoice fields; replacing the items recomputes the totals
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice updated", body = ApiResponse<InvoiceResponse>),
        (status = 400, description = "Empty item list", body = crate::errors::ErrorResponse),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, ServiceError> {
    auth_user.require(Capability::InvoicesManage)?;
    let invoice = state.services.invoices.update_invoice(id, request).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Change an invoice's payment status
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}/status",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<InvoiceResponse>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Invoice already paid", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn update_invoice_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateInvoiceStatusRequest>,
) -> Result<Json<ApiResponse<InvoiceResponse>>, ServiceError> {
    auth_user.require(Capability::InvoicesRecordPayment)?;
    let invoice = state
        .services
        .invoices
        .update_status(id, request.status)
        .await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Delete an invoice and its line items
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice deleted", body = ApiResponse<String>),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "invoices"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    auth_user.require(Capability::InvoicesManage)?;
    state.services.invoices.delete_invoice(id).await?;
    Ok(Json(ApiResponse::success("Invoice deleted".to_string())))
}
