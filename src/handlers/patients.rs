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
    services::patients::{CreatePatientRequest, PatientResponse, UpdatePatientRequest},
    ApiResponse, AppState,
};

/// List all patients
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Patients retrieved", body = ApiResponse<Vec<PatientResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn list_patients(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PatientResponse>>>, ServiceError> {
    auth_user.require(Capability::PatientsRead)?;
    let patients = state.services.patients.list_patients().await?;
    Ok(Json(ApiResponse::success(patients)))
}

/// Patients referred by one dentist
#[utoipa::path(
    get,
    path = "/api/v1/patients/dentist/{dentist_id}",
    params(("dentist_id" = Uuid, Path, description = "Dentist ID")),
    responses(
        (status = 200, description = "Patients retrieved", body = ApiResponse<Vec<PatientResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn list_patients_for_dentist(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<PatientResponse>>>, ServiceError> {
    auth_user.require(Capability::PatientsRead)?;
    let patients = state
        .services
        .patients
        .list_patients_for_dentist(dentist_id)
        .await?;
    Ok(Json(ApiResponse::success(patients)))
}

/// Fetch one patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient retrieved", body = ApiResponse<PatientResponse>),
        (status = 404, description = "Patient not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<PatientResponse>>, ServiceError> {
    auth_user.require(Capability::PatientsRead)?;
    let patient = state.services.patients.get_patient(id).await?;
    Ok(Json(ApiResponse::success(patient)))
}

/// Add a patient record
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = ApiResponse<PatientResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn create_patient(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::PatientsManage)?;
    let patient = state.services.patients.create_patient(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(patient))))
}

/// Update a patient record
#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(("id" = Uuid, Path, description = "Patient ID")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = ApiResponse<PatientResponse>),
        (status = 404, description = "Patient not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<ApiResponse<PatientResponse>>, ServiceError> {
    auth_user.require(Capability::PatientsManage)?;
    let patient = state.services.patients.update_patient(id, request).await?;
    Ok(Json(ApiResponse::success(patient)))
}

/// Delete a patient record
#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    params(("id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient deleted", body = ApiResponse<String>),
        (status = 404, description = "Patient not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "patients"
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    auth_user.require(Capability::PatientsManage)?;
    state.services.patients.delete_patient(id).await?;
    Ok(Json(ApiResponse::success("Patient deleted".to_string())))
}
