use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    services::messages::{ContactResponse, MessageResponse, SendMessageRequest},
    ApiResponse, AppState,
};

/// Accounts the caller can message
#[utoipa::path(
    get,
    path = "/api/v1/messages/contacts",
    responses(
        (status = 200, description = "Contacts retrieved", body = ApiResponse<Vec<ContactResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "messages"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<ContactResponse>>>, ServiceError> {
    let contacts = state
        .services
        .messages
        .list_contacts(auth_user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(contacts)))
}

/// Message thread for a case, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/messages/case/{case_id}",
    params(("case_id" = Uuid, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Messages retrieved", body = ApiResponse<Vec<MessageResponse>>),
        (status = 404, description = "Case not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "messages"
)]
pub async fn list_for_case(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MessageResponse>>>, ServiceError> {
    let messages = state.services.messages.list_for_case(case_id).await?;
    Ok(Json(ApiResponse::success(messages)))
}

/// Send a message on a case
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Empty content", body = crate::errors::ErrorResponse),
        (status = 404, description = "Case or recipient not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let message = state
        .services
        .messages
        .send_message(auth_user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))))
}
