use axum::{extract::State, response::Json, routing::post, Router};

use crate::{
    errors::ServiceError,
    services::insights::{
        BenchmarkInsightRequest, GrowthInsightRequest, InsightResponse, MenuInsightRequest,
    },
    ApiResponse, AppState,
};

/// AI insight routes, nested under `/api/v1/insights`.
pub fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/benchmark", post(benchmark_insights))
        .route("/growth", post(growth_insights))
        .route("/menu", post(menu_insights))
}

/// Narrative read of metrics against the benchmark ranges
#[utoipa::path(
    post,
    path = "/api/v1/insights/benchmark",
    request_body = BenchmarkInsightRequest,
    responses(
        (status = 200, description = "Generated insight", body = ApiResponse<InsightResponse>),
        (status = 400, description = "No restaurant type given or configured", body = crate::errors::ErrorResponse),
        (status = 502, description = "Language model request failed", body = crate::errors::ErrorResponse),
        (status = 503, description = "AI insights are not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "Insights"
)]
pub async fn benchmark_insights(
    State(state): State<AppState>,
    Json(payload): Json<BenchmarkInsightRequest>,
) -> Result<Json<ApiResponse<InsightResponse>>, ServiceError> {
    let insight = state.services.insights.benchmark_insights(payload).await?;
    Ok(Json(ApiResponse::success(insight)))
}

#[utoipa::path(
    post,
    path = "/api/v1/insights/growth",
    request_body = GrowthInsightRequest,
    responses(
        (status = 200, description = "Generated growth plan", body = ApiResponse<InsightResponse>),
        (status = 400, description = "No restaurant type given or configured", body = crate::errors::ErrorResponse),
        (status = 502, description = "Language model request failed", body = crate::errors::ErrorResponse),
        (status = 503, description = "AI insights are not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "Insights"
)]
pub async fn growth_insights(
    State(state): State<AppState>,
    Json(payload): Json<GrowthInsightRequest>,
) -> Result<Json<ApiResponse<InsightResponse>>, ServiceError> {
    let insight = state.services.insights.growth_insights(payload).await?;
    Ok(Json(ApiResponse::success(insight)))
}

/// Menu engineering suggestions from the best sellers
#[utoipa::path(
    post,
    path = "/api/v1/insights/menu",
    request_body = MenuInsightRequest,
    responses(
        (status = 200, description = "Generated menu suggestions", body = ApiResponse<InsightResponse>),
        (status = 400, description = "No restaurant type given or configured", body = crate::errors::ErrorResponse),
        (status = 502, description = "Language model request failed", body = crate::errors::ErrorResponse),
        (status = 503, description = "AI insights are not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "Insights"
)]
pub async fn menu_insights(
    State(state): State<AppState>,
    Json(payload): Json<MenuInsightRequest>,
) -> Result<Json<ApiResponse<InsightResponse>>, ServiceError> {
    let insight = state.services.insights.menu_insights(payload).await?;
    Ok(Json(ApiResponse::success(insight)))
}
