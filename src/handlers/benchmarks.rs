use std::str::FromStr;

use axum::{
    extract::Path,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    benchmarks::{available_types, display_name, restaurant_profile, RestaurantType, RestaurantTypeProfile},
    errors::ServiceError,
    ApiResponse, AppState,
};

/// Benchmark catalog routes, nested under `/api/v1/benchmarks`.
pub fn benchmarks_routes() -> Router<AppState> {
    Router::new()
        .route("/types", get(list_types))
        .route("/:restaurant_type", get(get_profile))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RestaurantTypeSummary {
    pub id: RestaurantType,
    pub name: String,
}

/// Restaurant formats we hold benchmarks for
#[utoipa::path(
    get,
    path = "/api/v1/benchmarks/types",
    responses(
        (status = 200, description = "Restaurant types with display names", body = ApiResponse<Vec<RestaurantTypeSummary>>)
    ),
    tag = "Benchmarks"
)]
pub async fn list_types() -> Json<ApiResponse<Vec<RestaurantTypeSummary>>> {
    let types = available_types()
        .into_iter()
        .map(|id| RestaurantTypeSummary {
            id,
            name: display_name(id).to_string(),
        })
        .collect();
    Json(ApiResponse::success(types))
}

/// Full benchmark profile for one restaurant type
#[utoipa::path(
    get,
    path = "/api/v1/benchmarks/{restaurant_type}",
    params(("restaurant_type" = String, Path, description = "Restaurant type, e.g. fine_dine")),
    responses(
        (status = 200, description = "Benchmark profile", body = ApiResponse<RestaurantTypeProfile>),
        (status = 404, description = "Unknown restaurant type", body = crate::errors::ErrorResponse)
    ),
    tag = "Benchmarks"
)]
pub async fn get_profile(
    Path(restaurant_type): Path<String>,
) -> Result<Json<ApiResponse<RestaurantTypeProfile>>, ServiceError> {
    let restaurant_type = RestaurantType::from_str(&restaurant_type).map_err(|_| {
        ServiceError::NotFound(format!("Unknown restaurant type: {restaurant_type}"))
    })?;
    Ok(Json(ApiResponse::success(
        restaurant_profile(restaurant_type).clone(),
    )))
}
