use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;

use crate::{errors::ServiceError, services::orders::KitchenTicket, ApiResponse, AppState};

/// Kitchen display routes, nested under `/api/v1/kitchen`.
pub fn kitchen_routes() -> Router<AppState> {
    Router::new().route("/queue", get(kitchen_queue))
}

/// Pending, preparing and ready orders, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/kitchen/queue",
    responses(
        (status = 200, description = "Open kitchen tickets", body = ApiResponse<Vec<KitchenTicket>>)
    ),
    tag = "Kitchen"
)]
pub async fn kitchen_queue(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<KitchenTicket>>>, ServiceError> {
    let tickets = state.services.orders.kitchen_queue(Utc::now()).await?;
    Ok(Json(ApiResponse::success(tickets)))
}
