use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    errors::ServiceError,
    services::reports::{CaseReport, DentistReport, FinancialReport},
    ApiResponse, AppState,
};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Reporting window in months (default 6, max 36)
    pub months: Option<u32>,
}

/// Invoice totals by status, monthly revenue, top dentists by revenue
#[utoipa::path(
    get,
    path = "/api/v1/reports/financial",
    params(("months" = Option<u32>, Query, description = "Window in months (default 6)")),
    responses(
        (status = 200, description = "Report computed", body = ApiResponse<FinancialReport>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn financial_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<FinancialReport>>, ServiceError> {
    let report = state.services.reports.financial_report(query.months).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Case counts by status and priority plus monthly volume
#[utoipa::path(
    get,
    path = "/api/v1/reports/cases",
    params(("months" = Option<u32>, Query, description = "Window in months (default 6)")),
    responses(
        (status = 200, description = "Report computed", body = ApiResponse<CaseReport>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn case_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<CaseReport>>, ServiceError> {
    let report = state.services.reports.case_report(query.months).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Per-dentist case counts and billed revenue
#[utoipa::path(
    get,
    path = "/api/v1/reports/dentists",
    params(("months" = Option<u32>, Query, description = "Window in months (default 6)")),
    responses(
        (status = 200, description = "Report computed", body = ApiResponse<DentistReport>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "reports"
)]
pub async fn dentist_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<DentistReport>>, ServiceError> {
    let report = state.services.reports.dentist_report(query.months).await?;
    Ok(Json(ApiResponse::success(report)))
}
