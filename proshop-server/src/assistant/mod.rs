//! Language-model assistant (shop chat widget and product copywriter)
//!
//! Thin client over a chat-completion endpoint. Callers decide what to do
//! on failure; the HTTP handlers swap in a canned reply so the widget keeps
//! answering when the model is unreachable or no key is configured.

pub mod prompts;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;

/// Upper bound on one completion call
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant API key is not configured")]
    NotConfigured,

    #[error("assistant API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("assistant request failed: {0}")]
    Transport(String),

    #[error("assistant returned no text")]
    EmptyReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Chat-completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    pub fn new(http: reqwest::Client, config: AssistantConfig) -> Self {
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// One completion: `system` prompt first, then `messages` in order.
    pub async fn complete(
        &self,
        system: &str,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::NotConfigured)?;

        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(ChatMessage::system(system));
        all.extend(messages);

        let body = CompletionRequest {
            model: &self.config.model,
            messages: all,
            max_tokens,
            temperature,
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(AssistantError::EmptyReply)
    }
}
