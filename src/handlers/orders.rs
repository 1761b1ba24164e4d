use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::{
    entities::order,
    errors::ServiceError,
    services::orders::{
        CreateOrderRequest, OrderDetail, OrderFilter, ReplaceOrderItemsRequest,
        UpdateOrderStatusRequest,
    },
    ApiResponse, AppState, PaginatedResponse,
};

/// POS order routes, nested under `/api/v1/orders`.
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/items", put(replace_order_items))
        .route("/:id/status", put(update_order_status))
}

/// Ring up a new order for a table
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created and table seated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Invalid order or unavailable menu item", body = crate::errors::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Table already holds an unpaid order", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderDetail>>), ServiceError> {
    let order = state.services.orders.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))))
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderFilter),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<PaginatedResponse<order::Model>>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<ApiResponse<PaginatedResponse<order::Model>>>, ServiceError> {
    let orders = state.services.orders.list_orders(filter).await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its items", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderDetail>>, ServiceError> {
    let order = state.services.orders.get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Replace the lines of an order that has not left the kitchen
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/items",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = ReplaceOrderItemsRequest,
    responses(
        (status = 200, description = "Items replaced and totals recomputed", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Order can no longer be edited", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn replace_order_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceOrderItemsRequest>,
) -> Result<Json<ApiResponse<OrderDetail>>, ServiceError> {
    let order = state.services.orders.replace_items(id, payload).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Move an order through the kitchen workflow
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Transition not allowed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order changed since it was read", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<OrderDetail>>, ServiceError> {
    let order = state.services.orders.update_status(id, payload).await?;
    Ok(Json(ApiResponse::success(order)))
}
