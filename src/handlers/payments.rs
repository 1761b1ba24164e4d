use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::{
    entities::payment,
    errors::ServiceError,
    services::payments::{Bill, PaymentResult, RecordPaymentRequest},
    ApiResponse, AppState, ListQuery, PaginatedResponse,
};

/// Billing routes scoped to one order. Merged into the orders router.
pub fn order_billing_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/bill", get(get_bill))
        .route("/:id/payments", post(record_payment))
}

/// Payment ledger routes, nested under `/api/v1/payments`.
pub fn payments_routes() -> Router<AppState> {
    Router::new().route("/", get(list_payments))
}

/// Bill for an order
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/bill",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Itemised bill with tax", body = ApiResponse<Bill>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Billing"
)]
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Bill>>, ServiceError> {
    let bill = state.services.billing.get_bill(id).await?;
    Ok(Json(ApiResponse::success(bill)))
}

/// Settle an order and free its table
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/payments",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<PaymentResult>),
        (status = 402, description = "Insufficient amount tendered", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order already paid or cancelled", body = crate::errors::ErrorResponse)
    ),
    tag = "Billing"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResult>>), ServiceError> {
    let result = state.services.billing.record_payment(id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result))))
}

/// List payments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(ListQuery),
    responses(
        (status = 200, description = "Payments retrieved", body = ApiResponse<PaginatedResponse<payment::Model>>)
    ),
    tag = "Billing"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<payment::Model>>>, ServiceError> {
    let limit = state.config.clamp_page_size(query.limit);
    let payments = state
        .services
        .billing
        .list_payments(query.page, limit)
        .await?;
    Ok(Json(ApiResponse::success(payments)))
}
