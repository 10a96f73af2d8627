use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    errors::ServiceError,
    services::dentists::{CreateDentistRequest, DentistResponse},
    ApiResponse, AppState,
};

/// The referring-dentist directory
#[utoipa::path(
    get,
    path = "/api/v1/dentists",
    responses(
        (status = 200, description = "Dentists retrieved", body = ApiResponse<Vec<DentistResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "dentists"
)]
pub async fn list_dentists(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<DentistResponse>>>, ServiceError> {
    auth_user.require(Capability::DentistsRead)?;
    let dentists = state.services.dentists.list_dentists().await?;
    Ok(Json(ApiResponse::success(dentists)))
}

/// Fetch one dentist
#[utoipa::path(
    get,
    path = "/api/v1/dentists/{id}",
    params(("id" = Uuid, Path, description = "Dentist ID")),
    responses(
        (status = 200, description = "Dentist retrieved", body = ApiResponse<DentistResponse>),
        (status = 404, description = "Dentist not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "dentists"
)]
pub async fn get_dentist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<DentistResponse>>, ServiceError> {
    auth_user.require(Capability::DentistsRead)?;
    let dentist = state.services.dentists.get_dentist(id).await?;
    Ok(Json(ApiResponse::success(dentist)))
}

/// Add a dentist to the directory (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/dentists",
    request_body = CreateDentistRequest,
    responses(
        (status = 201, description = "Dentist created", body = ApiResponse<DentistResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "dentists"
)]
pub async fn create_dentist(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateDentistRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::UsersManage)?;
    let dentist = state.services.dentists.create_dentist(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(dentist))))
}
