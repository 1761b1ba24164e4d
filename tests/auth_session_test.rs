mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use common::{response_json, TestApp};

fn set_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie")
        .to_string()
}

#[tokio::test]
async fn login_with_demo_credentials_sets_session_cookie() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "demo@margros.in", "password": "demo@123" })),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("admin_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains(&format!("Max-Age={}", app.state.config.session_max_age_secs)));
    assert!(!cookie.contains("Secure"));

    let body = response_json(response).await;
    assert_eq!(body, json!({ "success": true, "message": "Login successful" }));
}

#[tokio::test]
async fn login_cookie_opens_the_api() {
    let app = TestApp::new().await;

    let login = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "demo@margros.in", "password": "demo@123" })),
            None,
        )
        .await;
    let cookie = set_cookie(&login);
    let pair = cookie.split(';').next().unwrap().to_string();

    let response = app
        .request(Method::GET, "/api/auth/session", None, Some(&pair))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["email"], "demo@margros.in");

    let tables = app.request(Method::GET, "/api/v1/tables", None, Some(&pair)).await;
    assert_eq!(tables.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "demo@margros.in", "password": "guess" })),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = response_json(response).await;
    assert_eq!(body, json!({ "error": "Invalid email or password" }));
}

#[tokio::test]
async fn malformed_login_body_is_a_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "username": "demo" })),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::new().await;

    let response = app.request(Method::POST, "/api/auth/logout", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("admin_session=;"));
    assert!(cookie.contains("Max-Age=0"));
    let body = response_json(response).await;
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn api_without_session_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/orders", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let forged = app
        .request(
            Method::GET,
            "/api/v1/orders",
            None,
            Some("admin_session=not.a.token"),
        )
        .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dashboard_without_session_redirects_home() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/dashboard", None, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn dashboard_with_session_is_served() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(Method::GET, "/dashboard", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["signed_in_as"], "demo@margros.in");
}

#[tokio::test]
async fn public_paths_skip_the_gate() {
    let app = TestApp::new().await;

    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status(), StatusCode::OK);
    let body = response_json(health).await;
    assert_eq!(body["status"], "healthy");

    let status = app.request(Method::GET, "/status", None, None).await;
    assert_eq!(status.status(), StatusCode::OK);
    let body = response_json(status).await;
    assert_eq!(body["environment"], "test");
    assert_eq!(body["ai_insights"], false);

    let home = app.request(Method::GET, "/", None, None).await;
    assert_eq!(home.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/status", None, None).await;

    assert!(response.headers().contains_key("x-request-id"));
}
