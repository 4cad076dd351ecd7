//! Taskbridge LLM provider infrastructure adapter.
//!
//! Implements the [`workflow::CompletionProvider`] trait for any service that
//! speaks the OpenAI chat-completions protocol. OpenRouter is the default
//! endpoint.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, and response
//! parsing live here. The [`workflow`] crate sees only
//! [`workflow::CompletionProvider`]; falling back to a template when this
//! adapter fails is the caller's decision.
//!
//! A client without an API key is valid: every call fails with
//! [`workflow::RemoteError::NotConfigured`] so callers degrade instead of
//! refusing to start.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use workflow::{CompletionProvider, RemoteError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-pro-exp-03-25:free";

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct LlmClientError(#[from] reqwest::Error);

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatCompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("taskbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    #[instrument(skip_all)]
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) else {
            return Err(RemoteError::NotConfigured(
                "OPENROUTER_API_KEY is not set".to_string(),
            ));
        };

        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(model = %self.config.model, prompt_len = prompt.len(), "Requesting completion");

        let reply: ChatResponse = transport::send_json(
            self.http.post(&url).bearer_auth(api_key).json(&request),
            "completion endpoint",
        )
        .await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RemoteError::Decode("No response received from the API".to_string()))
    }
}
