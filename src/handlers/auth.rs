use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{capabilities_for, AuthError, AuthUser, Capability, NewUser, Role, TokenResponse},
    entities::user,
    errors::ServiceError,
    events::Event,
    ApiResponse, AppState,
};

/// Account payload returned from auth endpoints. Never carries the
/// password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    /// One of "dentist", "technician", "admin"
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email address
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus account, returned from both register and login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthPayload {
    pub token: TokenResponse,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CapabilitiesResponse {
    pub role: Role,
    pub capabilities: Vec<Capability>,
}

/// Create an account and issue a token for it
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<AuthPayload>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Username or email taken", body = crate::errors::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let role = Role::from_str(&request.role).map_err(|_| AuthError::UnknownRole)?;

    let account = state
        .auth_service
        .register(NewUser {
            username: request.username,
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            role,
        })
        .await?;

    let token = state.auth_service.generate_token(&account)?;

    if let Some(event_sender) = &state.event_sender {
        let _ = event_sender.send(Event::UserRegistered(account.id)).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AuthPayload {
            token,
            user: account.into(),
        })),
    ))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<AuthPayload>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, ServiceError> {
    request
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let account = state
        .auth_service
        .authenticate(&request.username, &request.password)
        .await?;
    let token = state.auth_service.generate_token(&account)?;

    if let Some(event_sender) = &state.event_sender {
        let _ = event_sender.send(Event::UserLoggedIn(account.id)).await;
    }

    Ok(Json(ApiResponse::success(AuthPayload {
        token,
        user: account.into(),
    })))
}

/// Revoke the presented token. Succeeds even when the token was already
/// revoked so clients can always clear their session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = ApiResponse<String>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingAuth)?;

    match state.auth_service.revoke_token(token).await {
        Ok(()) | Err(AuthError::RevokedToken) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(ApiResponse::success("Logged out".to_string())))
}

/// The authenticated principal
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ServiceError> {
    let account = user::Entity::find_by_id(auth_user.user_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", auth_user.user_id)))?;

    Ok(Json(ApiResponse::success(account.into())))
}

/// The capability list for the caller's role; clients use this to decide
/// which navigation entries to show.
#[utoipa::path(
    get,
    path = "/api/v1/auth/capabilities",
    responses(
        (status = 200, description = "Granted capabilities", body = ApiResponse<CapabilitiesResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "auth"
)]
pub async fn capabilities(
    auth_user: AuthUser,
) -> Json<ApiResponse<CapabilitiesResponse>> {
    Json(ApiResponse::success(CapabilitiesResponse {
        role: auth_user.role,
        capabilities: capabilities_for(auth_user.role).to_vec(),
    }))
}
