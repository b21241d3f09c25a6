//! # Completion Service Client
//!
//! Thin client for the opaque text-completion service. The rest of the
//! pipeline only depends on the [`CompletionClient`] trait, so tests inject
//! scripted stand-ins and the adapter never needs a live endpoint.

use crate::config::CompletionConfig;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Opaque text-completion service
///
/// Given a system prompt and a user prompt, returns the reply text or a
/// failure. `is_available` reflects credential configuration resolved once at
/// startup; callers check it before issuing requests.
pub trait CompletionClient {
    fn is_available(&self) -> bool;

    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> impl std::future::Future<Output = AppResult<String>> + Send;
}

/// Chat-completions request payload
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat-completions response payload
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    error: ChatApiError,
}

#[derive(Debug, Deserialize)]
struct ChatApiError {
    message: String,
}

/// OpenAI-compatible chat-completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client from configuration
    ///
    /// A missing API key is not an error: the client reports itself
    /// unavailable and every caller degrades to its fallback path.
    pub fn new(config: CompletionConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        match &config.api_key {
            Some(_) => info!(model = %config.model, "Completion client initialized"),
            None => warn!("Completion API key not found, generative features disabled"),
        }

        Ok(Self { config, client })
    }
}

impl CompletionClient for OpenAiClient {
    fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> AppResult<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| AppError::Completion("Completion client not configured".to_string()))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            model = %self.config.model,
            max_tokens = %max_tokens,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Surface the API's own message when the body carries one
            if let Ok(parsed) = serde_json::from_str::<ChatErrorResponse>(&body) {
                return Err(AppError::Completion(format!(
                    "Completion request failed ({}): {}",
                    status, parsed.error.message
                )));
            }
            return Err(AppError::Completion(format!(
                "Completion request failed ({}): {}",
                status, body
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Completion(format!("Malformed completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| AppError::Completion("Completion response had no content".to_string()))
    }
}
