use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use uuid::Uuid;

use crate::{
    entities::restaurant_table,
    errors::ServiceError,
    services::tables::{CreateTableRequest, UpdateTableStatusRequest},
    ApiResponse, AppState,
};

/// Floor plan routes, nested under `/api/v1/tables`.
pub fn tables_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tables).post(create_table))
        .route("/:id", get(get_table))
        .route("/:id/status", put(update_table_status))
}

/// List every table by name
#[utoipa::path(
    get,
    path = "/api/v1/tables",
    responses(
        (status = 200, description = "Tables retrieved", body = ApiResponse<Vec<restaurant_table::Model>>)
    ),
    tag = "Tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<restaurant_table::Model>>>, ServiceError> {
    let tables = state.services.tables.list_tables().await?;
    Ok(Json(ApiResponse::success(tables)))
}

#[utoipa::path(
    post,
    path = "/api/v1/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = ApiResponse<restaurant_table::Model>),
        (status = 400, description = "Invalid table", body = crate::errors::ErrorResponse),
        (status = 409, description = "Table name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    Json(payload): Json<CreateTableRequest>,
) -> Result<(StatusCode, Json<ApiResponse<restaurant_table::Model>>), ServiceError> {
    let table = state.services.tables.create_table(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(table))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tables/{id}",
    params(("id" = Uuid, Path, description = "Table ID")),
    responses(
        (status = 200, description = "Table retrieved", body = ApiResponse<restaurant_table::Model>),
        (status = 404, description = "Table not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<restaurant_table::Model>>, ServiceError> {
    let table = state.services.tables.get_table(id).await?;
    Ok(Json(ApiResponse::success(table)))
}

/// Seat, reserve or free a table
#[utoipa::path(
    put,
    path = "/api/v1/tables/{id}/status",
    params(("id" = Uuid, Path, description = "Table ID")),
    request_body = UpdateTableStatusRequest,
    responses(
        (status = 200, description = "Table status updated", body = ApiResponse<restaurant_table::Model>),
        (status = 400, description = "Table still holds an unpaid order", body = crate::errors::ErrorResponse),
        (status = 404, description = "Table not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn update_table_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableStatusRequest>,
) -> Result<Json<ApiResponse<restaurant_table::Model>>, ServiceError> {
    let table = state.services.tables.update_status(id, payload.status).await?;
    Ok(Json(ApiResponse::success(table)))
}
