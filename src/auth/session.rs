use std::time::Duration;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::AppConfig;

/// Name of the cookie carrying the signed admin session
pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// The signed-in admin, attached to request extensions by the session gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session cookie")]
    Missing,

    #[error("Session has expired")]
    Expired,

    #[error("Session token is invalid")]
    Invalid,

    #[error("Session token creation failed: {0}")]
    TokenCreation(String),
}

/// Signs and verifies session tokens and renders the cookie headers.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    max_age: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(secret: &str, max_age: Duration, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            max_age,
            secure,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.session_secret,
            config.session_max_age(),
            config.session_cookie_secure(),
        )
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let claims = SessionClaims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + self.max_age.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| SessionError::TokenCreation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionUser, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })?
            .claims;

        let issued_at = Utc.timestamp_opt(claims.iat, 0).single().ok_or(SessionError::Invalid)?;
        let expires_at = Utc.timestamp_opt(claims.exp, 0).single().ok_or(SessionError::Invalid)?;
        Ok(SessionUser {
            email: claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Verifies the session cookie found in `headers`, if any.
    pub fn read_session(&self, headers: &HeaderMap) -> Result<SessionUser, SessionError> {
        let token = cookie_value(headers, SESSION_COOKIE)
            .filter(|value| !value.is_empty())
            .ok_or(SessionError::Missing)?;
        self.verify(token)
    }

    pub fn login_cookie(&self, token: &str) -> String {
        self.cookie(token, self.max_age.as_secs())
    }

    pub fn logout_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age_secs: u64) -> String {
        let mut cookie = format!(
            "{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// First value of cookie `name` across every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
