//! Generation client abstraction.
//!
//! Defines the [`GenerationClient`] trait, the shared result types, and the
//! error taxonomy for remote generation calls. One provider is implemented:
//! [`openai::OpenAiClient`], speaking the `/v1/chat/completions` API.
//!
//! The trait is the narrow seam that lets tests swap in a deterministic
//! stub: `generate(prompt) -> script | error`, nothing else.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::prompt::AssembledPrompt;

pub mod openai;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Token usage for a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Tokens used in the prompt/input.
    pub input_tokens: u32,
    /// Tokens generated in the response.
    pub output_tokens: u32,
}

/// The raw script returned by the remote model.
///
/// Structure (the six Markdown sections) is enforced by prompt instruction,
/// never parsed or validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// The returned Markdown text.
    pub markdown: String,
    /// The model identifier that served the response.
    pub model: String,
    /// Token usage.
    pub usage: UsageStats,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by generation clients.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// No API credential configured. Checked before any network I/O.
    #[error("missing API credential: set OPENAI_API_KEY or [llm].api_key")]
    MissingCredential,
    /// HTTP transport failure.
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The bounded request timeout fired.
    #[error("generation request timed out after {0} seconds")]
    Timeout(u64),
    /// Provider rate-limit or quota error, surfaced verbatim, never retried.
    #[error("provider rate limit: {body}")]
    RateLimited {
        /// Raw (sanitized) response body.
        body: String,
    },
    /// Upstream provider responded with a non-success status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw (sanitized) response body.
        body: String,
    },
    /// Response did not match the expected schema.
    #[error("provider response parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Whether a human operator could reasonably retry the same request.
    ///
    /// Transport failures, timeouts, rate limits, and 5xx responses are
    /// transient; credential, 4xx, and parse failures are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::MissingCredential | Self::Parse(_) => false,
        }
    }

    /// Re-tag a transport error whose underlying cause was the bounded
    /// request timeout firing, wherever in the request lifecycle it
    /// happened (connect, send, or body read).
    pub fn with_timeout_bound(self, seconds: u64) -> Self {
        match self {
            Self::Request(e) if e.is_timeout() => Self::Timeout(seconds),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// A 429 maps to [`GenerationError::RateLimited`]; other non-2xx statuses
/// map to [`GenerationError::HttpStatus`].
///
/// # Errors
///
/// Returns `GenerationError::Request` on transport failure while reading
/// the body, `RateLimited`/`HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, GenerationError> {
    let status = response.status();
    let body = response.text().await?;
    if status.as_u16() == 429 {
        return Err(GenerationError::RateLimited {
            body: sanitize_http_error_body(&body),
        });
    }
    if !status.is_success() {
        return Err(GenerationError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact anything that looks like an API key, and
/// bound the length of an upstream error body before it reaches logs.
pub fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [r"sk-[A-Za-z0-9_\-]{20,}", r"Bearer [A-Za-z0-9_\-\.]{10,}"] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Narrow interface to the remote generation capability.
///
/// Implementations must be `Send + Sync` so the pipeline can hold them
/// behind an `Arc<dyn GenerationClient>`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send the assembled prompt and return the generated script.
    ///
    /// Single request/response, bounded timeout, no automatic retry.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on credential, network, timeout,
    /// rate-limit, or parse failure.
    async fn generate(&self, prompt: &AssembledPrompt) -> Result<GeneratedScript, GenerationError>;

    /// The model identifier this client is configured for.
    fn model_id(&self) -> &str;
}
