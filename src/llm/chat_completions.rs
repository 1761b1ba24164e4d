use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::config::AppConfig;

const SYSTEM_PROMPT: &str = "You are a restaurant operations analyst for Indian food businesses. \
Answer in concise markdown with concrete, numbered recommendations.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    options: ChatOptions,
}

impl ChatCompletionsClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        options: ChatOptions,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            options,
        })
    }

    /// Builds a client from config, or `None` when no API key is set.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, LlmError> {
        let Some(api_key) = config.llm_api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            return Ok(None);
        };
        Self::new(
            config.llm_api_url.clone(),
            api_key,
            config.llm_model.clone(),
            config.llm_timeout(),
            ChatOptions {
                temperature: config.llm_temperature,
                max_tokens: config.llm_max_tokens,
            },
        )
        .map(Some)
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        counter!("restaurant_pos_llm.requests", 1);
        let started = Instant::now();
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                counter!("restaurant_pos_llm.failures", 1);
                warn!(error = %e, "LLM request could not be sent");
                LlmError::Transport(e)
            })?;
        histogram!(
            "restaurant_pos_llm.latency_seconds",
            started.elapsed().as_secs_f64()
        );

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            counter!("restaurant_pos_llm.failures", 1);
            warn!("LLM provider rate limited the request");
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            counter!("restaurant_pos_llm.failures", 1);
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "LLM provider returned an error");
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        info!(response_len = content.len(), "LLM completion received");
        Ok(content)
    }
}
