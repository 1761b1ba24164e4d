//! Restaurant POS API Library
//!
//! Order entry, kitchen queue and billing for a single restaurant, plus an
//! admin dashboard that scores the restaurant against industry benchmarks.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod benchmarks;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod llm;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::{response::Json, routing::get, Extension, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::{SessionKeys, SessionUser};
use crate::llm::{ChatCompletionsClient, LlmClient, LlmError};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub sessions: SessionKeys,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires services from config. The insight endpoints stay disabled
    /// when no LLM API key is configured.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Result<Self, LlmError> {
        let llm = ChatCompletionsClient::from_config(&config)?
            .map(|client| Arc::new(client) as Arc<dyn LlmClient>);
        if llm.is_none() {
            ::tracing::info!("No LLM API key configured; AI insights disabled");
        }
        Ok(Self::with_llm(db, config, llm))
    }

    pub fn with_llm(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        llm: Option<Arc<dyn LlmClient>>,
    ) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config, llm);
        Self {
            sessions: SessionKeys::from_config(&config),
            db,
            config,
            services,
        }
    }
}

// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size; 0 means the configured default
    #[serde(default)]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Zero-based index of a 1-based `page` for `fetch_page`, or `None` when
/// the page starts at or past the last of `total` rows.
pub fn page_index(page: u64, limit: u64, total: u64) -> Option<u64> {
    let index = page.checked_sub(1)?;
    let offset = index.checked_mul(limit)?;
    (offset < total).then_some(index)
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Admin API, nested under `/api/v1` behind the session gate.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/tables", handlers::tables::tables_routes())
        .nest("/menu", handlers::menu::menu_routes())
        .nest(
            "/orders",
            handlers::orders::orders_routes().merge(handlers::payments::order_billing_routes()),
        )
        .nest("/payments", handlers::payments::payments_routes())
        .nest("/kitchen", handlers::kitchen::kitchen_routes())
        .nest("/settings", handlers::settings::settings_routes())
        .nest("/analytics", handlers::analytics::analytics_routes())
        .nest("/benchmarks", handlers::benchmarks::benchmarks_routes())
        .nest("/insights", handlers::insights::insights_routes())
}

/// Full application router with session gate, request ids and HTTP tracing.
/// CORS, compression and timeouts are left to the binary.
pub fn build_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "restaurant-pos-api up" }))
        .route("/dashboard", get(dashboard_landing))
        .merge(handlers::health::health_routes())
        .nest("/api/auth", auth::auth_routes())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::session_gate,
        ))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

#[derive(Serialize, ToSchema)]
struct DashboardLanding {
    signed_in_as: String,
    api: &'static str,
}

// Only reachable with a session; the gate redirects everyone else to `/`.
async fn dashboard_landing(Extension(user): Extension<SessionUser>) -> Json<DashboardLanding> {
    Json(DashboardLanding {
        signed_in_as: user.email,
        api: "/api/v1/analytics/dashboard",
    })
}
