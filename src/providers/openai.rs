//! OpenAI chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::prompt::AssembledPrompt;

use super::{check_http_response, GeneratedScript, GenerationClient, GenerationError, UsageStats};

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// OpenAI chat completions API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum completion tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A message in OpenAI chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    /// Role (`system` or `user`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// OpenAI chat completions API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response choices.
    pub choices: Vec<ChatChoice>,
    /// Model that served the response.
    pub model: String,
    /// Token usage.
    pub usage: Option<ChatUsage>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Assistant message for this choice.
    pub message: ChatResponseMessage,
}

/// Assistant message content.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    /// Optional text content.
    pub content: Option<String>,
}

/// Token usage statistics.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    /// Prompt token count.
    pub prompt_tokens: Option<u32>,
    /// Completion token count.
    pub completion_tokens: Option<u32>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Generation client for the OpenAI `/v1/chat/completions` API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Build a client from configuration.
    ///
    /// Fails fast on a missing or blank credential so no request is ever
    /// attempted without one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::MissingCredential`] when no API key is
    /// configured, or [`GenerationError::Request`] if the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(GenerationError::MissingCredential),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_seconds: config.request_timeout_seconds,
            client,
        })
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a chat-completions request from an assembled prompt.
#[doc(hidden)]
pub fn build_request(
    model: &str,
    temperature: f32,
    max_tokens: u32,
    prompt: &AssembledPrompt,
) -> ChatRequest {
    ChatRequest {
        model: model.to_owned(),
        messages: vec![
            ChatMessage {
                role: "system".to_owned(),
                content: prompt.system.clone(),
            },
            ChatMessage {
                role: "user".to_owned(),
                content: prompt.user.clone(),
            },
        ],
        temperature,
        max_tokens: Some(max_tokens),
    }
}

/// Parse a chat-completions response into a generated script.
///
/// # Errors
///
/// Returns `GenerationError::Parse` when the body cannot be deserialized,
/// carries no choices, or the first choice has no text content.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<GeneratedScript, GenerationError> {
    let resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Parse(e.to_string()))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Parse("missing choices[0]".to_owned()))?;

    let markdown = choice
        .message
        .content
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| GenerationError::Parse("empty completion content".to_owned()))?;

    let usage = UsageStats {
        input_tokens: resp
            .usage
            .as_ref()
            .and_then(|u| u.prompt_tokens)
            .unwrap_or(0),
        output_tokens: resp
            .usage
            .as_ref()
            .and_then(|u| u.completion_tokens)
            .unwrap_or(0),
    };

    Ok(GeneratedScript {
        markdown,
        model: resp.model,
        usage,
    })
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(&self, prompt: &AssembledPrompt) -> Result<GeneratedScript, GenerationError> {
        let api_request = build_request(&self.model, self.temperature, self.max_output_tokens, prompt);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.user.chars().count(),
            "sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&api_request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e).with_timeout_bound(self.timeout_seconds))?;

        let payload = check_http_response(response)
            .await
            .map_err(|e| e.with_timeout_bound(self.timeout_seconds))?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
