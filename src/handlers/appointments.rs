use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    errors::ServiceError,
    services::appointments::{
        AppointmentResponse, CreateAppointmentRequest, UpdateAppointmentRequest,
    },
    ApiResponse, AppState,
};

/// List all appointments in schedule order
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    responses(
        (status = 200, description = "Appointments retrieved", body = ApiResponse<Vec<AppointmentResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ServiceError> {
    auth_user.require(Capability::AppointmentsRead)?;
    let appointments = state.services.appointments.list_appointments().await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// Fetch one appointment
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment retrieved", body = ApiResponse<AppointmentResponse>),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    auth_user.require(Capability::AppointmentsRead)?;
    let appointment = state.services.appointments.get_appointment(id).await?;
    Ok(Json(ApiResponse::success(appointment)))
}

/// Appointments for one dentist
#[utoipa::path(
    get,
    path = "/api/v1/appointments/dentist/{dentist_id}",
    params(("dentist_id" = Uuid, Path, description = "Dentist ID")),
    responses(
        (status = 200, description = "Appointments retrieved", body = ApiResponse<Vec<AppointmentResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn list_for_dentist(
    State(state): State<AppState>,
    Path(dentist_id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ServiceError> {
    auth_user.require(Capability::AppointmentsRead)?;
    let appointments = state
        .services
        .appointments
        .list_for_dentist(dentist_id)
        .await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// Appointments for one patient
#[utoipa::path(
    get,
    path = "/api/v1/appointments/patient/{patient_id}",
    params(("patient_id" = Uuid, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Appointments retrieved", body = ApiResponse<Vec<AppointmentResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn list_for_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ServiceError> {
    auth_user.require(Capability::AppointmentsRead)?;
    let appointments = state
        .services
        .appointments
        .list_for_patient(patient_id)
        .await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// Appointments on one day (date as YYYY-MM-DD)
#[utoipa::path(
    get,
    path = "/api/v1/appointments/date/{date}",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Appointments retrieved", body = ApiResponse<Vec<AppointmentResponse>>),
        (status = 400, description = "Unparseable date", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn list_for_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<AppointmentResponse>>>, ServiceError> {
    auth_user.require(Capability::AppointmentsRead)?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidInput(format!("Invalid date: {}", date)))?;
    let appointments = state.services.appointments.list_for_date(date).await?;
    Ok(Json(ApiResponse::success(appointments)))
}

/// Schedule an appointment
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment scheduled", body = ApiResponse<AppointmentResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::AppointmentsManage)?;
    let appointment = state
        .services
        .appointments
        .create_appointment(request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(appointment))))
}

/// Reschedule or change an appointment
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = ApiResponse<AppointmentResponse>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<AppointmentResponse>>, ServiceError> {
    auth_user.require(Capability::AppointmentsManage)?;
    let appointment = state
        .services
        .appointments
        .update_appointment(id, request)
        .await?;
    Ok(Json(ApiResponse::success(appointment)))
}

/// Remove an appointment
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment deleted", body = ApiResponse<String>),
        (status = 404, description = "Appointment not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "appointments"
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    auth_user.require(Capability::AppointmentsManage)?;
    state.services.appointments.delete_appointment(id).await?;
    Ok(Json(ApiResponse::success(
        "Appointment deleted".to_string(),
    )))
}
