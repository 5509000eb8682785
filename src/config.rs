//! Configuration loading and management.
//!
//! Loads configuration from `./guidegen.toml` (or `$GUIDEGEN_CONFIG_PATH`).
//! Environment variables override file values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

// ── Top-level config ────────────────────────────────────────────

/// Top-level guidegen configuration loaded from TOML.
///
/// Path: `./guidegen.toml` or `$GUIDEGEN_CONFIG_PATH`.
/// Env vars override file values; file values override defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuidegenConfig {
    /// Generation provider settings (`[llm]`).
    pub llm: LlmConfig,
    /// Reference corpus settings (`[reference]`).
    pub reference: ReferenceConfig,
    /// Uploaded-material extraction settings (`[extraction]`).
    pub extraction: ExtractionConfig,
}

impl GuidegenConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$GUIDEGEN_CONFIG_PATH` or `./guidegen.toml`.
    /// If the file does not exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: GuidegenConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file found, using defaults");
                Ok(GuidegenConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("GUIDEGEN_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("guidegen.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids unsafe `set_var` in tests).
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(key) = env("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(v) = env("GUIDEGEN_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = env("GUIDEGEN_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = env("GUIDEGEN_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.llm.request_timeout_seconds = n,
                Err(_) => tracing::warn!(
                    var = "GUIDEGEN_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("GUIDEGEN_REFERENCE_PATH") {
            self.reference.path = v;
        }
    }

    /// Parse a TOML string into config (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error when the TOML does not match the config schema.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: GuidegenConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── LLM config ──────────────────────────────────────────────────

/// Generation provider configuration (`[llm]`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL.
    pub base_url: String,
    /// API key. Usually supplied via `OPENAI_API_KEY` rather than the file.
    pub api_key: Option<String>,
    /// Model name.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum output tokens per generation.
    pub max_output_tokens: u32,
    /// Bounded timeout for the outbound generation request.
    pub request_timeout_seconds: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "__REDACTED__"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 1024,
            request_timeout_seconds: 60,
        }
    }
}

// ── Reference config ────────────────────────────────────────────

/// Reference corpus configuration (`[reference]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Path to the reference library document.
    pub path: String,
    /// Maximum characters of reference text kept per prompt (tail wins).
    pub max_chars: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            path: "master_reference.md".to_string(),
            max_chars: 40_000,
        }
    }
}

// ── Extraction config ───────────────────────────────────────────

/// Uploaded-material extraction configuration (`[extraction]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum extracted characters kept per uploaded file.
    pub max_chars_per_file: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_chars_per_file: 20_000,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
