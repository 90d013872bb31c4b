//! The chat model capability and its HTTP implementation.
//!
//! The inference API is a black box behind [`ChatModel`] so the editor and
//! refinement loops can be driven by fakes in tests. The production
//! implementation speaks the OpenAI-compatible chat completions protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Primary environment variable for the API key.
pub const API_KEY_ENV_VAR: &str = "ENGRAVE_API_KEY";

/// Fallback key variable, honored for OpenAI-compatible endpoints.
pub const FALLBACK_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Environment variable to override the endpoint base URL.
pub const BASE_URL_ENV_VAR: &str = "ENGRAVE_API_URL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when neither the CLI nor the config names one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation, as kept in the refinement history and sent
/// over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Black-box LLM request/response capability.
///
/// One request per call, synchronous from the caller's point of view; no
/// retry or backoff is applied anywhere in this crate.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: Option<&str>, turns: &[Turn]) -> Result<String, ModelError>;
}

/// OpenAI-compatible HTTP chat model.
pub struct HttpModel {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpModel {
    /// Build a model client with an explicit endpoint. Tests point this at
    /// a mock server.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        HttpModel {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Resolve endpoint and key from overrides and the environment.
    ///
    /// Key order: `--key` override, then `ENGRAVE_API_KEY`, then
    /// `OPENAI_API_KEY`. A missing key is fatal for the invocation.
    pub fn from_env(model: String, key_override: Option<String>) -> Result<Self, ModelError> {
        let api_key = key_override
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.is_empty()))
            .or_else(|| std::env::var(FALLBACK_KEY_ENV_VAR).ok().filter(|k| !k.is_empty()))
            .ok_or(ModelError::MissingApiKey(API_KEY_ENV_VAR))?;

        let base_url = std::env::var(BASE_URL_ENV_VAR)
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(base_url, api_key, model))
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for HttpModel {
    async fn complete(&self, system: Option<&str>, turns: &[Turn]) -> Result<String, ModelError> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = system {
            messages.push(WireMessage {
                role: "system",
                content: system,
            });
        }
        for turn in turns {
            messages.push(WireMessage {
                role: match turn.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &turn.content,
            });
        }

        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(ModelError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::MalformedResponse("no choices in response".to_string()))?;

        // Empty content is passed through; the caller decides what an
        // empty message means.
        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}
