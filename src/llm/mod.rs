//! Completion client for the narrative insight endpoints.
//!
//! One trait, one OpenAI-compatible implementation. Calls are single
//! request/response with a timeout; nothing here retries.

mod chat_completions;

pub use chat_completions::ChatCompletionsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM provider rate limited the request")]
    RateLimited,

    #[error("LLM provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("LLM provider returned no content")]
    EmptyResponse,

    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        ServiceError::ExternalServiceError(err.to_string())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends `prompt` as the user turn and returns the assistant's text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn llm_errors_surface_as_bad_gateway() {
        let err: ServiceError = LlmError::RateLimited.into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
