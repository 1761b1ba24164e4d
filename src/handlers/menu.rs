use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::{
    entities::menu_category,
    errors::ServiceError,
    services::menu::{CreateCategoryRequest, CreateMenuItemRequest, MenuItemFilter, MenuItemView},
    ApiResponse, AppState,
};

/// Menu routes, nested under `/api/v1/menu`.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id/availability", post(toggle_availability))
}

#[utoipa::path(
    get,
    path = "/api/v1/menu/categories",
    responses(
        (status = 200, description = "Categories in display order", body = ApiResponse<Vec<menu_category::Model>>)
    ),
    tag = "Menu"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<menu_category::Model>>>, ServiceError> {
    let categories = state.services.menu.list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<menu_category::Model>),
        (status = 400, description = "Invalid category", body = crate::errors::ErrorResponse)
    ),
    tag = "Menu"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<menu_category::Model>>), ServiceError> {
    let category = state.services.menu.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

/// List menu items, optionally by category or availability
#[utoipa::path(
    get,
    path = "/api/v1/menu/items",
    params(MenuItemFilter),
    responses(
        (status = 200, description = "Menu items retrieved", body = ApiResponse<Vec<MenuItemView>>)
    ),
    tag = "Menu"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<MenuItemFilter>,
) -> Result<Json<ApiResponse<Vec<MenuItemView>>>, ServiceError> {
    let items = state.services.menu.list_items(filter).await?;
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/menu/items",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = ApiResponse<MenuItemView>),
        (status = 400, description = "Invalid menu item", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Menu"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MenuItemView>>), ServiceError> {
    let item = state.services.menu.create_item(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// Flip an item between available and sold out
#[utoipa::path(
    post,
    path = "/api/v1/menu/items/{id}/availability",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Availability toggled", body = ApiResponse<MenuItemView>),
        (status = 404, description = "Menu item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Menu"
)]
pub async fn toggle_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MenuItemView>>, ServiceError> {
    let item = state.services.menu.toggle_availability(id).await?;
    Ok(Json(ApiResponse::success(item)))
}
