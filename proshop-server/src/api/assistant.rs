//! Chat widget and product description generator
//!
//! Both endpoints answer 200 even when the model is unavailable: a missing
//! key or a failed call swaps in canned text and sets `fallback`.

use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::util::non_empty;

use super::{ApiJson, ApiResult, ok};
use crate::assistant::prompts::{self, CHAT_FALLBACK};
use crate::assistant::{AssistantError, ChatMessage};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/api/products/generate-description", post(generate_description))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub description: String,
    pub fallback: bool,
}

fn log_degraded(endpoint: &'static str, err: &AssistantError) {
    match err {
        AssistantError::NotConfigured => {
            tracing::debug!(endpoint, "Assistant not configured, using fallback")
        }
        other => tracing::warn!(endpoint, error = %other, "Assistant call failed, using fallback"),
    }
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let message = non_empty(req.message.as_deref()).ok_or_else(|| AppError::required("message"))?;

    let mut messages = prompts::trim_history(req.history);
    messages.push(ChatMessage::user(message));

    let result = state
        .assistant
        .complete(
            prompts::SHOP_ASSISTANT_PROMPT,
            messages,
            prompts::CHAT_MAX_TOKENS,
            prompts::CHAT_TEMPERATURE,
        )
        .await;

    match result {
        Ok(reply) => ok(ChatResponse {
            reply,
            fallback: false,
        }),
        Err(e) => {
            log_degraded("chat", &e);
            ok(ChatResponse {
                reply: CHAT_FALLBACK.to_string(),
                fallback: true,
            })
        }
    }
}

/// POST /api/products/generate-description
pub async fn generate_description(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DescriptionRequest>,
) -> ApiResult<DescriptionResponse> {
    let name = non_empty(req.name.as_deref()).ok_or_else(|| AppError::required("name"))?;
    let brand = non_empty(req.brand.as_deref());
    let category = non_empty(req.category.as_deref());
    let features: Vec<String> = req
        .features
        .iter()
        .filter_map(|f| non_empty(Some(f.as_str())).map(str::to_string))
        .collect();

    let prompt = prompts::description_request(name, brand, category, &features);
    let result = state
        .assistant
        .complete(
            prompts::COPYWRITER_PROMPT,
            vec![ChatMessage::user(prompt)],
            prompts::DESCRIPTION_MAX_TOKENS,
            prompts::DESCRIPTION_TEMPERATURE,
        )
        .await;

    match result {
        Ok(description) => ok(DescriptionResponse {
            description,
            fallback: false,
        }),
        Err(e) => {
            log_degraded("generate-description", &e);
            ok(DescriptionResponse {
                description: prompts::fallback_description(name, brand, category),
                fallback: true,
            })
        }
    }
}
