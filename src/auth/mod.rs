/*!
 * # Admin session
 *
 * The admin dashboard signs in with a single set of demo credentials taken
 * from configuration. A successful login sets an `admin_session` cookie
 * holding an HS256 token signed with the session secret. The session gate
 * middleware reads that cookie on every request:
 *
 * - public paths (login page, auth endpoints, static assets, health and docs)
 *   always pass
 * - `/dashboard*` without a valid session redirects to `/`
 * - `/api/v1*` without a valid session is rejected with 401
 *
 * There is no user store behind this.
 */

mod session;

pub use session::{cookie_value, SessionClaims, SessionError, SessionKeys, SessionUser, SESSION_COOKIE};

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::{errors::ServiceError, AppState};

/// Path prefixes reachable without a session. `/` itself is matched exactly.
const PUBLIC_PREFIXES: [&str; 8] = [
    "/api/auth/login",
    "/api/auth/logout",
    "/static",
    "/favicon",
    "/health",
    "/status",
    "/swagger-ui",
    "/api-docs",
];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "demo@margros.in")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthMessage {
    pub success: bool,
    pub message: String,
}

/// Auth routes, nested under `/api/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(current_session))
}

fn with_cookie(mut response: Response, cookie: &str) -> Result<Response, ServiceError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ServiceError::InternalError(format!("Invalid session cookie: {e}")))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}

/// Sign in with the demo credentials
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = AuthMessage),
        (status = 400, description = "Malformed request body", body = crate::errors::ErrorResponse),
        (status = 401, description = "Wrong email or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(credentials) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected login body");
        ServiceError::BadRequest("Invalid login request body".to_string())
    })?;

    let config = &state.config;
    if credentials.email != config.demo_email || credentials.password != config.demo_password {
        warn!("Failed admin login attempt");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid email or password" })),
        )
            .into_response());
    }

    let token = state
        .sessions
        .issue(&credentials.email, Utc::now())
        .map_err(|e| {
            error!(error = %e, "Failed to sign session token");
            ServiceError::InternalError(e.to_string())
        })?;

    info!("Admin signed in");
    let body = Json(AuthMessage {
        success: true,
        message: "Login successful".to_string(),
    });
    with_cookie(body.into_response(), &state.sessions.login_cookie(&token))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Session cookie cleared", body = AuthMessage)),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let body = Json(AuthMessage {
        success: true,
        message: "Logout successful".to_string(),
    });
    with_cookie(body.into_response(), &state.sessions.logout_cookie())
}

/// The signed-in admin
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionUser),
        (status = 401, description = "No valid session", body = crate::errors::ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn current_session(
    user: Option<Extension<SessionUser>>,
) -> Result<Json<SessionUser>, ServiceError> {
    user.map(|Extension(user)| Json(user))
        .ok_or_else(|| ServiceError::Unauthorized("Not signed in".to_string()))
}

fn is_public(path: &str) -> bool {
    path == "/" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Checks the session cookie and guards the dashboard and the admin API.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    if is_public(&path) {
        return next.run(request).await;
    }

    match state.sessions.read_session(request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(reason) => {
            if path.starts_with("/dashboard") {
                debug!(path = %path, reason = %reason, "Redirecting to login");
                Redirect::to("/").into_response()
            } else if path.starts_with("/api/v1") {
                debug!(path = %path, reason = %reason, "Rejecting unauthenticated API call");
                ServiceError::Unauthorized("Authentication required".to_string()).into_response()
            } else {
                next.run(request).await
            }
        }
    }
}
