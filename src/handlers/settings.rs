use axum::{extract::State, response::Json, routing::get, Router};

use crate::{
    errors::ServiceError,
    services::settings::{ConfiguredStatus, RestaurantSettings, UpdateSettingsRequest},
    ApiResponse, AppState,
};

/// Restaurant profile routes, nested under `/api/v1/settings`.
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/configured", get(is_configured))
}

/// Current restaurant profile, `null` until one is saved
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Restaurant settings", body = ApiResponse<Option<RestaurantSettings>>)
    ),
    tag = "Settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<RestaurantSettings>>>, ServiceError> {
    let settings = state.services.settings.get_settings().await?;
    Ok(Json(ApiResponse::success(settings)))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<RestaurantSettings>),
        (status = 400, description = "Invalid settings", body = crate::errors::ErrorResponse)
    ),
    tag = "Settings"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<RestaurantSettings>>, ServiceError> {
    let settings = state.services.settings.upsert_settings(payload).await?;
    Ok(Json(ApiResponse::success(settings)))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/configured",
    responses(
        (status = 200, description = "Whether a restaurant type has been chosen", body = ApiResponse<ConfiguredStatus>)
    ),
    tag = "Settings"
)]
pub async fn is_configured(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ConfiguredStatus>>, ServiceError> {
    let configured = state.services.settings.is_configured().await?;
    Ok(Json(ApiResponse::success(ConfiguredStatus { configured })))
}
