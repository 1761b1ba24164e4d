#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use restaurant_pos_api::{
    auth::SESSION_COOKIE,
    build_router,
    config::AppConfig,
    db,
    llm::LlmClient,
    services::{
        menu::CreateMenuItemRequest,
        tables::CreateTableRequest,
    },
    AppState,
};

pub const TEST_SESSION_SECRET: &str = "test_session_secret_for_integration_tests_only";

/// Helper harness for spinning up an application backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    session_cookie: String,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::build(|_| {}, None).await
    }

    /// Same as `new`, with config tweaks applied before the state is wired.
    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        Self::build(customize, None).await
    }

    /// Uses the given completion client instead of one built from config.
    pub async fn with_llm(llm: Arc<dyn LlmClient>) -> Self {
        Self::build(|_| {}, Some(llm)).await
    }

    async fn build(customize: impl FnOnce(&mut AppConfig), llm: Option<Arc<dyn LlmClient>>) -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("pos_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_SESSION_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        customize(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let state = match llm {
            Some(client) => AppState::with_llm(db_arc, cfg, Some(client)),
            None => AppState::new(db_arc, cfg).expect("valid llm config for tests"),
        };

        let token = state
            .sessions
            .issue(&state.config.demo_email, Utc::now())
            .expect("issue session token");
        let session_cookie = format!("{SESSION_COOKIE}={token}");

        Self {
            router: build_router(state.clone()),
            state,
            session_cookie,
            _db_dir: db_dir,
        }
    }

    /// Cookie header value carrying a valid admin session.
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Send a request against the router with an optional cookie header.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = if let Some(json) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for signed-in JSON requests.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request(method, uri, body, Some(self.session_cookie()))
            .await
    }

    pub async fn seed_table(&self, name: &str) -> Uuid {
        self.state
            .services
            .tables
            .create_table(CreateTableRequest {
                name: name.to_string(),
                seats: 4,
            })
            .await
            .expect("seed table for tests")
            .id
    }

    pub async fn seed_menu_item(&self, name: &str, price: Decimal) -> Uuid {
        self.state
            .services
            .menu
            .create_item(CreateMenuItemRequest {
                name: name.to_string(),
                price,
                category_id: None,
                description: None,
                is_available: Some(true),
            })
            .await
            .expect("seed menu item for tests")
            .id
    }

    /// Creates an order through the API and returns its JSON `data`.
    pub async fn place_order(&self, table_id: Uuid, lines: &[(Uuid, i32)]) -> Value {
        let items: Vec<Value> = lines
            .iter()
            .map(|(menu_item_id, quantity)| json!({ "menu_item_id": menu_item_id, "quantity": quantity }))
            .collect();
        let response = self
            .request_authenticated(
                Method::POST,
                "/api/v1/orders",
                Some(json!({ "table_id": table_id, "items": items })),
            )
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        response_json(response).await["data"].clone()
    }
}

pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is json")
}

/// Decimal fields serialize as strings.
pub fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .expect("decimal string parses")
}
