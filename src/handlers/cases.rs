use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    errors::ServiceError,
    services::cases::{
        parse_case_status, CaseFilter, CaseListResponse, CaseResponse, CaseStatus,
        CaseStatusHistoryResponse, CreateCaseRequest, UpdateCaseRequest, UpdateCaseStatusRequest,
    },
    ApiResponse, AppState,
};

fn default_page() -> u64 {
    1
}
fn default_per_page() -> u64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct CaseListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<String>,
    pub patient_id: Option<Uuid>,
}

/// Case with its full status trail
#[derive(Debug, Serialize, ToSchema)]
pub struct CaseDetailResponse {
    pub case: CaseResponse,
    pub status_history: Vec<CaseStatusHistoryResponse>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<CaseStatus>, ServiceError> {
    raw.map(parse_case_status).transpose()
}

/// List cases, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/v1/cases",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("per_page" = Option<u64>, Query, description = "Items per page (default: 20)"),
        ("status" = Option<String>, Query, description = "Filter by case status"),
        ("patient_id" = Option<Uuid>, Query, description = "Filter by patient"),
    ),
    responses(
        (status = 200, description = "Cases retrieved", body = ApiResponse<CaseListResponse>),
        (status = 400, description = "Unknown status value", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn list_cases(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<ApiResponse<CaseListResponse>>, ServiceError> {
    auth_user.require(Capability::CasesRead)?;
    let filter = CaseFilter {
        status: parse_status_filter(query.status.as_deref())?,
        dentist_id: None,
        patient_id: query.patient_id,
    };
    let cases = state
        .services
        .cases
        .list_cases(filter, query.page, query.per_page)
        .await?;
    Ok(Json(ApiResponse::success(cases)))
}

/// List cases referred by one dentist
#[utoipa::path(
    get,
    path = "/api/v1/cases/dentist/{dentist_id}",
    params(
        ("dentist_id" = Uuid, Path, description = "Dentist ID"),
        ("status" = Option<String>, Query, description = "Filter by case status"),
    ),
    responses(
        (status = 200, description = "Cases retrieved", body = ApiResponse<CaseListResponse>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn list_cases_for_dentist(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    auth_user: AuthUser,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<ApiResponse<CaseListResponse>>, ServiceError> {
    auth_user.require(Capability::CasesRead)?;
    let filter = CaseFilter {
        status: parse_status_filter(query.status.as_deref())?,
        dentist_id: Some(dentist_id),
        patient_id: query.patient_id,
    };
    let cases = state
        .services
        .cases
        .list_cases(filter, query.page, query.per_page)
        .await?;
    Ok(Json(ApiResponse::success(cases)))
}

/// Fetch one case together with its status history
#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case retrieved", body = ApiResponse<CaseDetailResponse>),
        (status = 404, description = "Case not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<CaseDetailResponse>>, ServiceError> {
    auth_user.require(Capability::CasesRead)?;
    let case = state.services.cases.get_case(id).await?;
    let status_history = state.services.cases.get_status_history(id).await?;
    Ok(Json(ApiResponse::success(CaseDetailResponse {
        case,
        status_history,
    })))
}

/// Open a new case
#[utoipa::path(
    post,
    path = "/api/v1/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = ApiResponse<CaseResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn create_case(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateCaseRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::CasesCreate)?;
    let case = state
        .services
        .cases
        .create_case(request, auth_user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(case))))
}

/// Update case fields other than status
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}",
    params(("id" = Uuid, Path, description = "Case ID")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = ApiResponse<CaseResponse>),
        (status = 404, description = "Case not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateCaseRequest>,
) -> Result<Json<ApiResponse<CaseResponse>>, ServiceError> {
    auth_user.require(Capability::CasesUpdate)?;
    let case = state.services.cases.update_case(id, request).await?;
    Ok(Json(ApiResponse::success(case)))
}

/// Move a case to a new status, recording why
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}/status",
    params(("id" = Uuid, Path, description = "Case ID")),
    request_body = UpdateCaseStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<CaseResponse>),
        (status = 400, description = "Missing notes or status unchanged", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Case not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn update_case_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateCaseStatusRequest>,
) -> Result<Json<ApiResponse<CaseResponse>>, ServiceError> {
    auth_user.require(Capability::CasesUpdateStatus)?;
    let case = state
        .services
        .cases
        .update_status(id, request, auth_user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(case)))
}

/// Delete a case and its history
#[utoipa::path(
    delete,
    path = "/api/v1/cases/{id}",
    params(("id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case deleted", body = ApiResponse<String>),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Case not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "cases"
)]
pub async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    auth_user.require(Capability::CasesDelete)?;
    state.services.cases.delete_case(id).await?;
    Ok(Json(ApiResponse::success("Case deleted".to_string())))
}
