use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;

use crate::{
    errors::ServiceError,
    services::analytics::{
        compare_metrics, BenchmarkReport, CompareRequest, ComparisonReport, DashboardData,
        RevenueQuery, RevenueSeries,
    },
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/v1/analytics`.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/revenue", get(get_revenue))
        .route("/benchmarks", get(get_benchmark_report))
        .route("/benchmarks/compare", post(compare_benchmarks))
}

/// Admin dashboard aggregates
#[utoipa::path(
    get,
    path = "/api/v1/analytics/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregates retrieved successfully", body = ApiResponse<DashboardData>)
    ),
    tag = "Analytics"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardData>>, ServiceError> {
    let dashboard = state.services.analytics.dashboard().await?;
    Ok(Json(ApiResponse::success(dashboard)))
}

/// Paid revenue bucketed by day, week, month or year
#[utoipa::path(
    get,
    path = "/api/v1/analytics/revenue",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue series retrieved successfully", body = ApiResponse<RevenueSeries>),
        (status = 400, description = "Unknown period", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueQuery>,
) -> Result<Json<ApiResponse<RevenueSeries>>, ServiceError> {
    let period = params.period.unwrap_or_default();
    let series = state.services.analytics.revenue(period, Utc::now()).await?;
    Ok(Json(ApiResponse::success(series)))
}

/// Scorecard of the live ledger against the configured restaurant type
#[utoipa::path(
    get,
    path = "/api/v1/analytics/benchmarks",
    responses(
        (status = 200, description = "Benchmark scorecard", body = ApiResponse<BenchmarkReport>),
        (status = 400, description = "Restaurant settings are not configured", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn get_benchmark_report(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BenchmarkReport>>, ServiceError> {
    let report = state.services.analytics.benchmark_report().await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Compare supplied metrics against a restaurant type
#[utoipa::path(
    post,
    path = "/api/v1/analytics/benchmarks/compare",
    request_body = CompareRequest,
    responses(
        (status = 200, description = "Scorecard, insights and adjusted expectations", body = ApiResponse<ComparisonReport>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "Analytics"
)]
pub async fn compare_benchmarks(
    Json(payload): Json<CompareRequest>,
) -> Json<ApiResponse<ComparisonReport>> {
    Json(ApiResponse::success(compare_metrics(&payload)))
}
