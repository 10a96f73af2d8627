use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Capability},
    entities::{inventory_category, supplier},
    errors::ServiceError,
    services::inventory::{
        CreateCategoryRequest, CreateInventoryItemRequest, CreateSupplierRequest,
        InventoryItemResponse, RestockRequest, UpdateInventoryItemRequest,
    },
    ApiResponse, AppState,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<inventory_category::Model> for CategoryResponse {
    fn from(model: inventory_category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierResponse {
    pub id: Uuid,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<supplier::Model> for SupplierResponse {
    fn from(model: supplier::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact_person: model.contact_person,
            email: model.email,
            phone: model.phone,
            address: model.address,
            created_at: model.created_at,
        }
    }
}

/// List all stock items
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    responses(
        (status = 200, description = "Items retrieved", body = ApiResponse<Vec<InventoryItemResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn list_items(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<InventoryItemResponse>>>, ServiceError> {
    auth_user.require(Capability::InventoryRead)?;
    let items = state.services.inventory.list_items().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Items at or below their reorder level
#[utoipa::path(
    get,
    path = "/api/v1/inventory/low-stock",
    responses(
        (status = 200, description = "Low-stock items retrieved", body = ApiResponse<Vec<InventoryItemResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<InventoryItemResponse>>>, ServiceError> {
    auth_user.require(Capability::InventoryRead)?;
    let items = state.services.inventory.list_low_stock().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Fetch one stock item
#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item retrieved", body = ApiResponse<InventoryItemResponse>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<InventoryItemResponse>>, ServiceError> {
    auth_user.require(Capability::InventoryRead)?;
    let item = state.services.inventory.get_item(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Add a stock item
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 201, description = "Item created", body = ApiResponse<InventoryItemResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    let item = state.services.inventory.create_item(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// Update a stock item
#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateInventoryItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<InventoryItemResponse>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Json<ApiResponse<InventoryItemResponse>>, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    let item = state.services.inventory.update_item(id, request).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Receive stock: adds the quantity and stamps the order date
#[utoipa::path(
    post,
    path = "/api/v1/inventory/restock",
    request_body = RestockRequest,
    responses(
        (status = 200, description = "Stock received", body = ApiResponse<InventoryItemResponse>),
        (status = 400, description = "Quantity must be positive", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn restock(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<RestockRequest>,
) -> Result<Json<ApiResponse<InventoryItemResponse>>, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    let item = state.services.inventory.restock(request).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Remove a stock item
#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<String>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<String>>, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    state.services.inventory.delete_item(id).await?;
    Ok(Json(ApiResponse::success("Item deleted".to_string())))
}

/// List item categories
#[utoipa::path(
    get,
    path = "/api/v1/inventory/categories",
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, ServiceError> {
    auth_user.require(Capability::InventoryRead)?;
    let categories = state.services.inventory.list_categories().await?;
    Ok(Json(ApiResponse::success(
        categories.into_iter().map(Into::into).collect(),
    )))
}

/// Add an item category
#[utoipa::path(
    post,
    path = "/api/v1/inventory/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 409, description = "Category name already exists", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn create_category(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    let category = state.services.inventory.create_category(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CategoryResponse::from(category))),
    ))
}

/// List suppliers
#[utoipa::path(
    get,
    path = "/api/v1/inventory/suppliers",
    responses(
        (status = 200, description = "Suppliers retrieved", body = ApiResponse<Vec<SupplierResponse>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<Vec<SupplierResponse>>>, ServiceError> {
    auth_user.require(Capability::InventoryRead)?;
    let suppliers = state.services.inventory.list_suppliers().await?;
    Ok(Json(ApiResponse::success(
        suppliers.into_iter().map(Into::into).collect(),
    )))
}

/// Add a supplier
#[utoipa::path(
    post,
    path = "/api/v1/inventory/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Supplier created", body = ApiResponse<SupplierResponse>),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "inventory"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreateSupplierRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    auth_user.require(Capability::InventoryManage)?;
    let supplier = state.services.inventory.create_supplier(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SupplierResponse::from(supplier))),
    ))
}
